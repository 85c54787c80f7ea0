//! Writing a solved model back into roster records.

use super::builder::AssignmentModel;
use crate::error::AssignError;
use crate::milp::{MilpSolution, SolverStatus};
use crate::roster::PersonRecord;
use chrono::NaiveDateTime;

/// Audit stamp applied to every newly placed record.
#[derive(Debug, Clone)]
pub struct AuditStamp {
    pub at: NaiveDateTime,
    pub by: String,
}

/// Returns a new roster with every free person placed in the group the
/// solution selects.
///
/// Fixed persons are copied unchanged. If any free person has no selected
/// group, or more than one, nothing is applied and an error is returned.
pub fn materialize(
    roster: &[PersonRecord],
    m: &AssignmentModel,
    solution: &MilpSolution,
    stamp: &AuditStamp,
    solver: &'static str,
) -> Result<Vec<PersonRecord>, AssignError> {
    let mut chosen = Vec::with_capacity(m.free.len());
    for (person, row) in m.free.iter().zip(&m.assign) {
        let mut selected = row
            .iter()
            .enumerate()
            .filter(|&(_, &var)| solution.is_set(var))
            .map(|(j, _)| j);
        match (selected.next(), selected.next()) {
            (Some(j), None) => chosen.push(j),
            (None, _) => {
                return Err(inconsistent(solver, format!("person {} has no group", person.id)));
            }
            (Some(_), Some(_)) => {
                return Err(inconsistent(
                    solver,
                    format!("person {} has several groups", person.id),
                ));
            }
        }
    }

    let mut updated = roster.to_vec();
    for (&position, &j) in m.free_positions.iter().zip(&chosen) {
        let record = &mut updated[position];
        record.group = Some(m.groups[j].name.clone());
        record.modified_at = Some(stamp.at);
        record.modified_by = Some(stamp.by.clone());
    }
    Ok(updated)
}

fn inconsistent(solver: &'static str, message: String) -> AssignError {
    AssignError::Solver {
        solver,
        status: SolverStatus::Error,
        message: format!("inconsistent solution: {message}"),
    }
}

#[cfg(test)]
mod tests {
    use super::super::builder::build_model;
    use super::super::config::WeightConfig;
    use super::*;
    use crate::roster::{Gender, GroupDefinition};
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, 1).unwrap()
    }

    fn stamp() -> AuditStamp {
        AuditStamp {
            at: today().and_hms_opt(9, 30, 0).unwrap(),
            by: "Optimization algorithm".into(),
        }
    }

    fn fixture() -> (Vec<PersonRecord>, AssignmentModel) {
        let roster = vec![
            PersonRecord::new(0, "a", "b")
                .with_age(3)
                .with_gender(Gender::Male)
                .with_points(1.0)
                .with_group("A"),
            PersonRecord::new(1, "c", "d")
                .with_age(4)
                .with_gender(Gender::Female)
                .with_points(2.0)
                .with_extra("Notiz", "Allergie"),
        ];
        let groups = vec![GroupDefinition::new("A", 2), GroupDefinition::new("B", 2)];
        let m = build_model(&roster, &groups, &WeightConfig::default(), today()).unwrap();
        (roster, m)
    }

    fn solution(values: Vec<f64>) -> MilpSolution {
        let mut s = MilpSolution::empty(SolverStatus::Optimal);
        s.values = values;
        s
    }

    #[test]
    fn test_materialize_assigns_and_stamps() {
        let (roster, m) = fixture();
        let updated = materialize(&roster, &m, &solution(vec![0.0, 1.0]), &stamp(), "test").unwrap();

        assert_eq!(updated.len(), 2);
        assert_eq!(updated[0], roster[0]);
        assert_eq!(updated[1].group.as_deref(), Some("B"));
        assert_eq!(updated[1].modified_at, Some(stamp().at));
        assert_eq!(updated[1].modified_by.as_deref(), Some("Optimization algorithm"));
        assert_eq!(updated[1].extra.get("Notiz").map(String::as_str), Some("Allergie"));
        // Input untouched.
        assert!(roster[1].group.is_none());
    }

    #[test]
    fn test_materialize_rejects_missing_group() {
        let (roster, m) = fixture();
        let err = materialize(&roster, &m, &solution(vec![0.0, 0.0]), &stamp(), "test").unwrap_err();
        assert!(matches!(err, AssignError::Solver { .. }));
    }

    #[test]
    fn test_materialize_rejects_double_group() {
        let (roster, m) = fixture();
        let err = materialize(&roster, &m, &solution(vec![1.0, 1.0]), &stamp(), "test").unwrap_err();
        assert!(err.to_string().contains("several groups"));
    }
}
