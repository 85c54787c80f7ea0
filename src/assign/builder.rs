//! Model building: roster partition and variable declaration.

use super::config::WeightConfig;
use super::{constraints, objective};
use crate::error::AssignError;
use crate::milp::{MilpModel, VarId, Variable};
use crate::roster::{validate_groups, Gender, GroupDefinition, PersonRecord, ResolvedPerson};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

/// Size summary of a built model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelStats {
    pub free_count: usize,
    pub fixed_count: usize,
    pub group_count: usize,
    /// Distinct ages across the whole roster.
    pub age_class_count: usize,
    /// Distinct genders across the whole roster.
    pub gender_count: usize,
    pub binary_count: usize,
    pub continuous_count: usize,
    pub constraint_count: usize,
}

/// A roster translated into a MILP, with the variable layout needed to
/// read a solution back.
#[derive(Debug, Clone)]
pub struct AssignmentModel {
    /// The underlying program.
    pub model: MilpModel,
    /// Groups in declaration order; index `j` below refers to this list.
    pub groups: Vec<GroupDefinition>,
    /// Free persons in roster order.
    pub free: Vec<ResolvedPerson>,
    /// Roster position of each entry of `free`.
    pub free_positions: Vec<usize>,
    /// Fixed occupants per group.
    pub fixed_counts: Vec<u32>,
    /// Number of fixed persons.
    pub fixed_total: usize,
    /// Sorted distinct ages across fixed and free persons.
    pub age_classes: Vec<i32>,
    /// Distinct genders across fixed and free persons.
    pub genders: Vec<Gender>,
    /// `assign[i][j]` for free person `i` and group `j`.
    pub assign: Vec<Vec<VarId>>,
    /// `gender_gap[k][j]` for age class `k` and group `j`; empty when
    /// gender balance is off.
    pub gender_gap: Vec<Vec<VarId>>,
    /// `age_gap[j]` per group; empty when age balance is off.
    pub age_gap: Vec<VarId>,
}

impl AssignmentModel {
    /// Whether there is nobody to place.
    pub fn is_trivial(&self) -> bool {
        self.free.is_empty()
    }

    /// Capacity left for free persons, floored at zero per group.
    pub fn free_capacity(&self) -> i64 {
        self.groups
            .iter()
            .zip(&self.fixed_counts)
            .map(|(g, &fixed)| (i64::from(g.capacity) - i64::from(fixed)).max(0))
            .sum()
    }

    /// Size summary.
    pub fn stats(&self) -> ModelStats {
        ModelStats {
            free_count: self.free.len(),
            fixed_count: self.fixed_total,
            group_count: self.groups.len(),
            age_class_count: self.age_classes.len(),
            gender_count: self.genders.len(),
            binary_count: self.model.binary_count(),
            continuous_count: self.model.continuous_count(),
            constraint_count: self.model.constraint_count(),
        }
    }
}

/// Validates the input and declares all variables, without constraints or
/// objective.
///
/// Decision variables cover every (free person, group) pair. Helper
/// variables exist only for balance terms with a positive weight.
pub fn declare(
    roster: &[PersonRecord],
    groups: &[GroupDefinition],
    weights: &WeightConfig,
    today: NaiveDate,
) -> Result<AssignmentModel, AssignError> {
    weights.validate()?;
    validate_groups(groups)?;
    let people = roster
        .iter()
        .map(|record| record.resolve(today))
        .collect::<Result<Vec<_>, _>>()?;

    let group_index: HashMap<&str, usize> = groups
        .iter()
        .enumerate()
        .map(|(j, g)| (g.name.as_str(), j))
        .collect();

    let mut fixed_counts = vec![0u32; groups.len()];
    let mut fixed_total = 0usize;
    let mut free = Vec::new();
    let mut free_positions = Vec::new();
    for (position, person) in people.iter().enumerate() {
        match &person.group {
            Some(name) => {
                fixed_total += 1;
                match group_index.get(name.as_str()) {
                    Some(&j) => fixed_counts[j] += 1,
                    None => warn!(id = person.id, group = %name, "fixed person in unconfigured group"),
                }
            }
            None => {
                free.push(person.clone());
                free_positions.push(position);
            }
        }
    }

    let age_classes: Vec<i32> = people
        .iter()
        .map(|p| p.age)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let genders: Vec<Gender> = people
        .iter()
        .map(|p| p.gender)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut model = MilpModel::new("group_assignment");
    let assign: Vec<Vec<VarId>> = free
        .iter()
        .map(|person| {
            groups
                .iter()
                .map(|g| model.add_variable(Variable::binary(format!("assign[{},{}]", person.id, g.name))))
                .collect()
        })
        .collect();

    let gender_gap: Vec<Vec<VarId>> = if weights.gender_balance_active() && !free.is_empty() {
        age_classes
            .iter()
            .map(|age| {
                groups
                    .iter()
                    .map(|g| model.add_variable(Variable::non_negative(format!("gender_gap[{age},{}]", g.name))))
                    .collect()
            })
            .collect()
    } else {
        Vec::new()
    };

    let age_gap: Vec<VarId> = if weights.age_balance_active() && !free.is_empty() {
        groups
            .iter()
            .map(|g| model.add_variable(Variable::non_negative(format!("age_gap[{}]", g.name))))
            .collect()
    } else {
        Vec::new()
    };

    debug!(
        free = free.len(),
        fixed = fixed_total,
        groups = groups.len(),
        age_classes = age_classes.len(),
        genders = genders.len(),
        "declared assignment variables"
    );

    Ok(AssignmentModel {
        model,
        groups: groups.to_vec(),
        free,
        free_positions,
        fixed_counts,
        fixed_total,
        age_classes,
        genders,
        assign,
        gender_gap,
        age_gap,
    })
}

/// Builds the complete model: variables, constraints and objective.
pub fn build_model(
    roster: &[PersonRecord],
    groups: &[GroupDefinition],
    weights: &WeightConfig,
    today: NaiveDate,
) -> Result<AssignmentModel, AssignError> {
    let mut assignment = declare(roster, groups, weights, today)?;
    if assignment.is_trivial() {
        return Ok(assignment);
    }
    constraints::add_constraints(&mut assignment);
    let objective = objective::compose_objective(&assignment, weights);
    assignment.model.set_objective(objective);
    Ok(assignment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::Gender;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, 1).unwrap()
    }

    fn person(id: usize, age: i32, gender: Gender) -> PersonRecord {
        PersonRecord::new(id, format!("first{id}"), format!("last{id}"))
            .with_age(age)
            .with_gender(gender)
            .with_points(id as f64)
    }

    fn groups() -> Vec<GroupDefinition> {
        vec![GroupDefinition::new("Igel", 3), GroupDefinition::new("Bären", 2)]
    }

    #[test]
    fn test_partition_and_declaration() {
        let roster = vec![
            person(0, 3, Gender::Male).with_group("Igel"),
            person(1, 4, Gender::Female),
            person(2, 5, Gender::Male),
            person(3, 6, Gender::Female).with_group("Bären"),
        ];
        let m = declare(&roster, &groups(), &WeightConfig::default(), today()).unwrap();

        assert_eq!(m.free.len(), 2);
        assert_eq!(m.free_positions, vec![1, 2]);
        assert_eq!(m.fixed_counts, vec![1, 1]);
        assert_eq!(m.fixed_total, 2);
        assert_eq!(m.assign.len(), 2);
        assert!(m.assign.iter().all(|row| row.len() == 2));
        assert_eq!(m.model.binary_count(), 4);
        assert_eq!(m.model.continuous_count(), 0);
        // Age classes span the whole roster, not just free persons.
        assert_eq!(m.age_classes, vec![3, 4, 5, 6]);
        assert_eq!(m.genders, vec![Gender::Male, Gender::Female]);
    }

    #[test]
    fn test_variables_not_pruned_by_eligibility() {
        let roster = vec![person(0, 9, Gender::Male)];
        let groups = vec![GroupDefinition::new("small", 2).with_age_range(0, 3)];
        let m = declare(&roster, &groups, &WeightConfig::default(), today()).unwrap();
        assert_eq!(m.model.binary_count(), 1);
    }

    #[test]
    fn test_helpers_gated_by_weights() {
        let roster = vec![
            person(0, 3, Gender::Male),
            person(1, 4, Gender::Female),
            person(2, 4, Gender::Male).with_group("Igel"),
        ];
        let off = declare(&roster, &groups(), &WeightConfig::default(), today()).unwrap();
        assert!(off.gender_gap.is_empty());
        assert!(off.age_gap.is_empty());

        let weights = WeightConfig::default()
            .with_gender_balance_weight(1.0)
            .with_age_balance_weight(1.0);
        let on = declare(&roster, &groups(), &weights, today()).unwrap();
        assert_eq!(on.gender_gap.len(), 2);
        assert!(on.gender_gap.iter().all(|row| row.len() == 2));
        assert_eq!(on.age_gap.len(), 2);
        assert_eq!(on.model.continuous_count(), 6);
    }

    #[test]
    fn test_empty_free_set_is_trivial() {
        let roster = vec![person(0, 3, Gender::Male).with_group("Igel")];
        let weights = WeightConfig::default().with_gender_balance_weight(2.0);
        let m = build_model(&roster, &groups(), &weights, today()).unwrap();
        assert!(m.is_trivial());
        assert_eq!(m.model.variable_count(), 0);
        assert_eq!(m.model.constraint_count(), 0);
    }

    #[test]
    fn test_validation_precedes_declaration() {
        let roster = vec![
            person(0, 3, Gender::Male),
            PersonRecord::new(1, "no", "points").with_age(2).with_gender(Gender::Female),
        ];
        let err = declare(&roster, &groups(), &WeightConfig::default(), today()).unwrap_err();
        assert!(matches!(
            err,
            AssignError::Validation {
                record: Some(1),
                field: "points",
                ..
            }
        ));
    }

    #[test]
    fn test_unconfigured_fixed_group_passes() {
        let roster = vec![person(0, 3, Gender::Male).with_group("Füchse"), person(1, 3, Gender::Male)];
        let m = declare(&roster, &groups(), &WeightConfig::default(), today()).unwrap();
        assert_eq!(m.fixed_counts, vec![0, 0]);
        assert_eq!(m.fixed_total, 1);
        assert_eq!(m.free_capacity(), 5);
    }

    #[test]
    fn test_stats() {
        let roster = vec![person(0, 3, Gender::Male), person(1, 4, Gender::Female)];
        let weights = WeightConfig::default().with_age_balance_weight(1.0);
        let m = build_model(&roster, &groups(), &weights, today()).unwrap();
        let stats = m.stats();
        assert_eq!(stats.free_count, 2);
        assert_eq!(stats.group_count, 2);
        assert_eq!(stats.binary_count, 4);
        assert_eq!(stats.continuous_count, 2);
        assert_eq!(stats.constraint_count, m.model.constraint_count());
    }
}
