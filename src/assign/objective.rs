//! Objective composition.

use super::builder::AssignmentModel;
use super::config::WeightConfig;
use crate::milp::Objective;

/// Combines the points reward and the balance penalties into one
/// objective to maximize.
///
/// Every free person is placed in exactly one group, so the points term
/// sums to `points_weight · Σ points(i)` for every feasible assignment. It
/// shifts the objective value but never changes which group wins.
pub fn compose_objective(m: &AssignmentModel, weights: &WeightConfig) -> Objective {
    let mut terms = Vec::with_capacity(
        m.free.len() * m.groups.len()
            + m.gender_gap.iter().map(Vec::len).sum::<usize>()
            + m.age_gap.len(),
    );

    for (person, row) in m.free.iter().zip(&m.assign) {
        let reward = weights.points_weight * person.points;
        terms.extend(row.iter().map(|&var| (var, reward)));
    }

    let gender_penalty = weights.gender_balance_weight * weights.gender_penalty_scale;
    for row in &m.gender_gap {
        terms.extend(row.iter().map(|&var| (var, -gender_penalty)));
    }

    let age_penalty = weights.age_balance_weight * weights.age_penalty_scale;
    terms.extend(m.age_gap.iter().map(|&var| (var, -age_penalty)));

    Objective::Maximize { terms }
}

/// The constant the points term takes on any feasible assignment.
pub fn points_constant(m: &AssignmentModel, weights: &WeightConfig) -> f64 {
    weights.points_weight * m.free.iter().map(|p| p.points).sum::<f64>()
}
