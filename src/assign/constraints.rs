//! Constraint generation.
//!
//! Hard rules (single assignment, capacity, age eligibility) are always
//! emitted. Balance linearizations are emitted only for the helper
//! variables [`declare`](super::builder::declare) created, so a zero weight
//! leaves no trace in the model.

use super::builder::AssignmentModel;
use crate::milp::{LinearConstraint, LinearExpr, VarId};
use crate::roster::{Gender, ResolvedPerson};

/// Adds every constraint for the declared variables.
pub fn add_constraints(m: &mut AssignmentModel) {
    add_single_assignment(m);
    add_capacity(m);
    add_gender_balance(m);
    add_age_balance(m);
    add_age_eligibility(m);
}

/// Σ_j assign[i,j] = 1 for every free person.
pub fn add_single_assignment(m: &mut AssignmentModel) {
    for (person, row) in m.free.iter().zip(&m.assign) {
        m.model.add_constraint(LinearConstraint::eq(
            format!("single[{}]", person.id),
            LinearExpr::sum(row.iter().copied()),
            1.0,
        ));
    }
}

/// Σ_i assign[i,j] + fixed(j) <= capacity(j) for every group.
pub fn add_capacity(m: &mut AssignmentModel) {
    for j in 0..m.groups.len() {
        let occupants = column(m, j, |_| true);
        let group = &m.groups[j];
        let remaining = f64::from(group.capacity) - f64::from(m.fixed_counts[j]);
        let row = LinearConstraint::le(format!("capacity[{}]", group.name), occupants, remaining);
        m.model.add_constraint(row);
    }
}

/// gender_gap[k,j] >= |male(k,j) − female(k,j)|, split into two rows.
pub fn add_gender_balance(m: &mut AssignmentModel) {
    if m.gender_gap.is_empty() {
        return;
    }
    for (k, &age) in m.age_classes.iter().enumerate() {
        for j in 0..m.groups.len() {
            let gap = m.gender_gap[k][j];
            let male = column(m, j, |p| p.age == age && p.gender == Gender::Male);
            let female = column(m, j, |p| p.age == age && p.gender == Gender::Female);
            let name = &m.groups[j].name;

            // gap − male + female >= 0
            let mut above = gap_expr(gap);
            above.add_expr(&male, -1.0);
            above.add_expr(&female, 1.0);
            // gap − female + male >= 0
            let mut below = gap_expr(gap);
            below.add_expr(&female, -1.0);
            below.add_expr(&male, 1.0);

            let rows = [
                LinearConstraint::ge(format!("gender_gap_pos[{age},{name}]"), above, 0.0),
                LinearConstraint::ge(format!("gender_gap_neg[{age},{name}]"), below, 0.0),
            ];
            m.model.constraints.extend(rows);
        }
    }
}

/// age_gap[j] >= |count(k,j) − total(j)| for every age class k.
///
/// `total(j)` is the number of free persons placed in `j`, so the gap
/// measures how far any single age class is from filling the group.
pub fn add_age_balance(m: &mut AssignmentModel) {
    if m.age_gap.is_empty() {
        return;
    }
    for j in 0..m.groups.len() {
        let gap = m.age_gap[j];
        let total = column(m, j, |_| true);
        for &age in &m.age_classes {
            let count = column(m, j, |p| p.age == age);
            let name = &m.groups[j].name;

            let mut above = gap_expr(gap);
            above.add_expr(&count, -1.0);
            above.add_expr(&total, 1.0);
            let mut below = gap_expr(gap);
            below.add_expr(&total, -1.0);
            below.add_expr(&count, 1.0);

            let rows = [
                LinearConstraint::ge(format!("age_gap_pos[{age},{name}]"), above, 0.0),
                LinearConstraint::ge(format!("age_gap_neg[{age},{name}]"), below, 0.0),
            ];
            m.model.constraints.extend(rows);
        }
    }
}

/// Nobody below `min_age` or above `max_age` joins the group.
///
/// Emitted only when some free person violates the bound.
pub fn add_age_eligibility(m: &mut AssignmentModel) {
    for j in 0..m.groups.len() {
        let (min_age, max_age) = (m.groups[j].min_age, m.groups[j].max_age);
        let mut rows = Vec::new();
        if let Some(min_age) = min_age {
            let too_young = column(m, j, |p| p.age < min_age);
            if !too_young.is_empty() {
                rows.push(LinearConstraint::eq(
                    format!("min_age[{}]", m.groups[j].name),
                    too_young,
                    0.0,
                ));
            }
        }
        if let Some(max_age) = max_age {
            let too_old = column(m, j, |p| p.age > max_age);
            if !too_old.is_empty() {
                rows.push(LinearConstraint::eq(
                    format!("max_age[{}]", m.groups[j].name),
                    too_old,
                    0.0,
                ));
            }
        }
        m.model.constraints.extend(rows);
    }
}

/// Σ assign[i,j] over free persons matching `filter`.
fn column(
    m: &AssignmentModel,
    j: usize,
    filter: impl Fn(&ResolvedPerson) -> bool,
) -> LinearExpr {
    LinearExpr::sum(
        m.free
            .iter()
            .zip(&m.assign)
            .filter(|(person, _)| filter(person))
            .map(|(_, row)| row[j]),
    )
}

fn gap_expr(gap: VarId) -> LinearExpr {
    LinearExpr::sum([gap])
}
