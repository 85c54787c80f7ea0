//! MILP solver interface and the `microlp` backend.

use super::model::{MilpModel, Objective, Relation};
use super::variables::{VarId, VarKind};
use good_lp::{
    microlp, variable, Expression, ProblemVariables, ResolutionError, Solution, SolverModel,
    Variable as LpVariable,
};
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Status of the solver after execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolverStatus {
    /// Proven optimal solution found.
    Optimal,
    /// Feasible (but not necessarily optimal) solution found.
    Feasible,
    /// No feasible solution exists.
    Infeasible,
    /// Objective is unbounded over the feasible region.
    Unbounded,
    /// Model is invalid or malformed.
    ModelInvalid,
    /// Solver exceeded time limit.
    Timeout,
    /// The engine failed for another reason.
    Error,
}

/// Solution from a MILP solver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MilpSolution {
    /// Solver status.
    pub status: SolverStatus,
    /// Objective function value (if a solution was found).
    pub objective_value: Option<f64>,
    /// Variable values, indexed by [`VarId`]. Empty without a solution.
    pub values: Vec<f64>,
    /// Solve time in milliseconds.
    pub solve_time_ms: i64,
    /// Engine diagnostic for failed solves.
    pub message: Option<String>,
}

impl MilpSolution {
    /// Creates an empty solution with the given status.
    pub fn empty(status: SolverStatus) -> Self {
        Self {
            status,
            objective_value: None,
            values: Vec::new(),
            solve_time_ms: 0,
            message: None,
        }
    }

    /// Attaches a diagnostic message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Whether a feasible solution was found.
    pub fn is_solution_found(&self) -> bool {
        matches!(self.status, SolverStatus::Optimal | SolverStatus::Feasible)
    }

    /// Value of a variable, zero when absent.
    pub fn value(&self, var: VarId) -> f64 {
        self.values.get(var.index()).copied().unwrap_or(0.0)
    }

    /// Whether a binary variable is set (value above 0.5).
    pub fn is_set(&self, var: VarId) -> bool {
        self.value(var) > 0.5
    }
}

/// Solver configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Maximum wall-clock solve time. `None` waits for the engine.
    pub time_limit: Option<Duration>,
}

impl SolverConfig {
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Time limit in milliseconds, if any.
    pub fn time_limit_ms(&self) -> Option<u64> {
        self.time_limit
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }
}

/// Trait for MILP solver implementations.
///
/// Implementors receive a fully built model and either return values for
/// every variable or a status explaining why none exist. Model
/// construction never depends on which implementation is used.
pub trait MilpSolver: Send + Sync {
    /// Solver name for logging and error reports.
    fn name(&self) -> &'static str;

    /// Solves the model and returns a solution.
    fn solve(&self, model: &MilpModel, config: &SolverConfig) -> MilpSolution;
}

/// Branch-and-bound backend built on `good_lp` with the pure-Rust
/// `microlp` engine.
///
/// With a time limit the engine runs on a worker thread; if the limit
/// passes first the solution reports [`SolverStatus::Timeout`] and the
/// worker's result is discarded when it eventually finishes.
#[derive(Debug, Clone, Copy, Default)]
pub struct MicroLpSolver;

impl MicroLpSolver {
    pub fn new() -> Self {
        Self
    }
}

impl MilpSolver for MicroLpSolver {
    fn name(&self) -> &'static str {
        "microlp"
    }

    fn solve(&self, model: &MilpModel, config: &SolverConfig) -> MilpSolution {
        if let Err(reason) = model.validate() {
            return MilpSolution::empty(SolverStatus::ModelInvalid).with_message(reason);
        }

        let start_time = Instant::now();
        debug!(
            model = %model.name,
            variables = model.variable_count(),
            constraints = model.constraint_count(),
            "solving with microlp"
        );

        let outcome = match config.time_limit {
            None => solve_microlp(model),
            Some(limit) => {
                let (tx, rx) = mpsc::channel();
                let owned = model.clone();
                std::thread::spawn(move || {
                    // The receiver is gone once the caller timed out.
                    let _ = tx.send(solve_microlp(&owned));
                });
                match rx.recv_timeout(limit) {
                    Ok(outcome) => outcome,
                    Err(RecvTimeoutError::Timeout) => {
                        warn!(model = %model.name, limit_ms = limit.as_millis() as u64, "solver timed out");
                        let mut solution = MilpSolution::empty(SolverStatus::Timeout);
                        solution.solve_time_ms = elapsed_ms(start_time);
                        return solution;
                    }
                    Err(RecvTimeoutError::Disconnected) => {
                        Err(ResolutionError::Other("solver worker terminated"))
                    }
                }
            }
        };

        let mut solution = match outcome {
            Ok(values) => MilpSolution {
                status: SolverStatus::Optimal,
                objective_value: model.evaluate(&values),
                values,
                solve_time_ms: 0,
                message: None,
            },
            Err(ResolutionError::Infeasible) => MilpSolution::empty(SolverStatus::Infeasible),
            Err(ResolutionError::Unbounded) => MilpSolution::empty(SolverStatus::Unbounded),
            Err(other) => MilpSolution::empty(SolverStatus::Error).with_message(other.to_string()),
        };
        solution.solve_time_ms = elapsed_ms(start_time);
        solution
    }
}

fn elapsed_ms(start: Instant) -> i64 {
    i64::try_from(start.elapsed().as_millis()).unwrap_or(i64::MAX)
}

/// Translates the model to `good_lp`, solves it and reads back all values.
fn solve_microlp(model: &MilpModel) -> Result<Vec<f64>, ResolutionError> {
    let mut vars = ProblemVariables::new();
    let handles: Vec<LpVariable> = model
        .variables
        .iter()
        .map(|v| {
            let definition = match v.kind {
                VarKind::Binary => variable().binary(),
                VarKind::Continuous => match v.upper {
                    Some(upper) => variable().min(v.lower).max(upper),
                    None => variable().min(v.lower),
                },
            };
            vars.add(definition.name(v.name.as_str()))
        })
        .collect();

    let to_expression = |terms: &[(VarId, f64)]| {
        let mut expr = Expression::with_capacity(terms.len());
        for &(id, coefficient) in terms {
            expr.add_mul(coefficient, handles[id.index()]);
        }
        expr
    };

    let unsolved = match &model.objective {
        Some(objective @ Objective::Maximize { .. }) => vars.maximise(to_expression(objective.terms())),
        Some(objective @ Objective::Minimize { .. }) => vars.minimise(to_expression(objective.terms())),
        None => vars.minimise(Expression::default()),
    };

    let mut problem = unsolved.using(microlp);
    for constraint in &model.constraints {
        let lhs = to_expression(&constraint.expr.terms);
        problem = problem.with(match constraint.relation {
            Relation::Le => lhs.leq(constraint.rhs),
            Relation::Ge => lhs.geq(constraint.rhs),
            Relation::Eq => lhs.eq(constraint.rhs),
        });
    }

    let solution = problem.solve()?;
    Ok(handles.iter().map(|&h| solution.value(h)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::milp::{LinearConstraint, LinearExpr, Variable};

    fn pick_one_model() -> MilpModel {
        let mut model = MilpModel::new("pick_one");
        let x = model.add_variable(Variable::binary("x"));
        let y = model.add_variable(Variable::binary("y"));
        model.add_constraint(LinearConstraint::eq("one", LinearExpr::sum([x, y]), 1.0));
        model.set_objective(Objective::Maximize {
            terms: vec![(x, 1.0), (y, 3.0)],
        });
        model
    }

    #[test]
    fn test_microlp_optimal() {
        let model = pick_one_model();
        let solution = MicroLpSolver::new().solve(&model, &SolverConfig::default());

        assert_eq!(solution.status, SolverStatus::Optimal);
        assert!(!solution.is_set(VarId(0)));
        assert!(solution.is_set(VarId(1)));
        assert!((solution.objective_value.unwrap() - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_microlp_with_time_limit() {
        let model = pick_one_model();
        let config = SolverConfig::default().with_time_limit(Duration::from_secs(30));
        let solution = MicroLpSolver::new().solve(&model, &config);

        assert!(solution.is_solution_found());
        assert!(solution.is_set(VarId(1)));
    }

    #[test]
    fn test_microlp_infeasible() {
        let mut model = MilpModel::new("infeasible");
        let x = model.add_variable(Variable::binary("x"));
        let y = model.add_variable(Variable::binary("y"));
        model.add_constraint(LinearConstraint::ge("both", LinearExpr::sum([x, y]), 2.0));
        model.add_constraint(LinearConstraint::le("at_most_one", LinearExpr::sum([x, y]), 1.0));

        let solution = MicroLpSolver::new().solve(&model, &SolverConfig::default());
        assert_eq!(solution.status, SolverStatus::Infeasible);
        assert!(solution.values.is_empty());
    }

    #[test]
    fn test_microlp_absolute_value_linearization() {
        // g >= x - 0.25, g >= 0.25 - x, minimize g with x forced to 1.
        let mut model = MilpModel::new("abs");
        let x = model.add_variable(Variable::binary("x"));
        let g = model.add_variable(Variable::non_negative("g"));
        model.add_constraint(LinearConstraint::eq("fix", LinearExpr::sum([x]), 1.0));
        model.add_constraint(LinearConstraint::ge(
            "pos",
            LinearExpr {
                terms: vec![(g, 1.0), (x, -1.0)],
            },
            -0.25,
        ));
        model.add_constraint(LinearConstraint::ge(
            "neg",
            LinearExpr {
                terms: vec![(g, 1.0), (x, 1.0)],
            },
            0.25,
        ));
        model.set_objective(Objective::Minimize {
            terms: vec![(g, 1.0)],
        });

        let solution = MicroLpSolver::new().solve(&model, &SolverConfig::default());
        assert!(solution.is_solution_found());
        assert!((solution.value(g) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_model() {
        let mut model = MilpModel::new("invalid");
        model.add_constraint(LinearConstraint::le("dangling", LinearExpr::sum([VarId(9)]), 1.0));

        let solution = MicroLpSolver::new().solve(&model, &SolverConfig::default());
        assert_eq!(solution.status, SolverStatus::ModelInvalid);
        assert!(solution.message.is_some());
    }

    #[test]
    fn test_solution_accessors() {
        let mut solution = MilpSolution::empty(SolverStatus::Feasible);
        solution.values = vec![0.9999999, 1e-9];
        assert!(solution.is_solution_found());
        assert!(solution.is_set(VarId(0)));
        assert!(!solution.is_set(VarId(1)));
        assert_eq!(solution.value(VarId(5)), 0.0);
    }

    #[test]
    fn test_solver_config_default() {
        let config = SolverConfig::default();
        assert!(config.time_limit.is_none());
        assert_eq!(
            SolverConfig::default()
                .with_time_limit(Duration::from_millis(1500))
                .time_limit_ms(),
            Some(1500)
        );
    }
}
