//! Assignment execution.

use super::builder::{build_model, ModelStats};
use super::config::AssignmentConfig;
use super::materialize::{materialize, AuditStamp};
use crate::error::AssignError;
use crate::milp::{MicroLpSolver, MilpSolver, SolverStatus};
use crate::report;
use crate::roster::{GroupDefinition, PersonRecord};
use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, warn};

/// Input of an assignment run: the roster and the groups to fill.
///
/// Runs only borrow the problem, so one problem can back several
/// concurrent runs with different configurations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssignmentProblem {
    pub roster: Vec<PersonRecord>,
    pub groups: Vec<GroupDefinition>,
}

impl AssignmentProblem {
    pub fn new(roster: Vec<PersonRecord>, groups: Vec<GroupDefinition>) -> Self {
        Self { roster, groups }
    }

    /// Number of persons without a group.
    pub fn free_count(&self) -> usize {
        self.roster.iter().filter(|r| r.is_free()).count()
    }
}

/// Result of a successful assignment run.
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentResult {
    /// The full roster, with previously free persons placed.
    pub roster: Vec<PersonRecord>,

    /// Ids of the records placed by this run, in roster order.
    pub assigned_ids: Vec<usize>,

    /// Objective value of the solution, `None` when nothing was solved.
    pub objective_value: Option<f64>,

    /// Size of the model that was solved.
    pub stats: ModelStats,

    /// Solve time in milliseconds.
    pub solve_time_ms: i64,

    /// Name of the solver that produced the solution.
    pub solver: &'static str,
}

impl AssignmentResult {
    /// Number of records placed by this run.
    pub fn assigned_count(&self) -> usize {
        self.assigned_ids.len()
    }

    /// Total points of everyone with a group.
    pub fn total_points(&self) -> f64 {
        report::total_points(&self.roster)
    }
}

/// Executes assignment runs.
///
/// # Examples
///
/// ```
/// use u_allot::assign::{AssignmentConfig, AssignmentProblem, AssignmentRunner};
/// use u_allot::roster::{Gender, GroupDefinition, PersonRecord};
///
/// let roster = vec![
///     PersonRecord::new(0, "Mia", "Keller").with_age(3).with_gender(Gender::Female).with_points(5.0),
///     PersonRecord::new(1, "Ben", "Maier").with_age(4).with_gender(Gender::Male).with_points(3.0),
/// ];
/// let groups = vec![GroupDefinition::new("Igel", 1), GroupDefinition::new("Bären", 1)];
/// let problem = AssignmentProblem::new(roster, groups);
///
/// let result = AssignmentRunner::run(&problem, &AssignmentConfig::default()).unwrap();
/// assert_eq!(result.assigned_count(), 2);
/// assert!(result.roster.iter().all(|r| r.group.is_some()));
/// ```
pub struct AssignmentRunner;

impl AssignmentRunner {
    /// Runs an assignment with the default [`MicroLpSolver`].
    pub fn run(
        problem: &AssignmentProblem,
        config: &AssignmentConfig,
    ) -> Result<AssignmentResult, AssignError> {
        Self::run_with_solver(problem, config, &MicroLpSolver)
    }

    /// Runs an assignment with the given solver.
    ///
    /// The solver is called at most once, and not at all when nobody is
    /// free. On error the problem's roster is unaffected and no partial
    /// assignment exists.
    pub fn run_with_solver(
        problem: &AssignmentProblem,
        config: &AssignmentConfig,
        solver: &dyn MilpSolver,
    ) -> Result<AssignmentResult, AssignError> {
        let span = info_span!(
            "assign",
            roster = problem.roster.len(),
            groups = problem.groups.len(),
            solver = solver.name()
        );
        let _guard = span.enter();

        config.validate()?;
        let today = config
            .reference_date
            .unwrap_or_else(|| Local::now().date_naive());
        let assignment = build_model(&problem.roster, &problem.groups, &config.weights, today)?;
        let stats = assignment.stats();

        if assignment.is_trivial() {
            debug!("no free persons, roster returned unchanged");
            return Ok(AssignmentResult {
                roster: problem.roster.clone(),
                assigned_ids: Vec::new(),
                objective_value: None,
                stats,
                solve_time_ms: 0,
                solver: solver.name(),
            });
        }

        info!(
            free = stats.free_count,
            fixed = stats.fixed_count,
            binaries = stats.binary_count,
            helpers = stats.continuous_count,
            constraints = stats.constraint_count,
            "model built"
        );

        let solution = solver.solve(&assignment.model, &config.solver);
        match solution.status {
            SolverStatus::Optimal | SolverStatus::Feasible => {}
            SolverStatus::Infeasible => {
                warn!(free = stats.free_count, "no feasible assignment");
                return Err(AssignError::Infeasible {
                    free: stats.free_count,
                    capacity: assignment.free_capacity(),
                });
            }
            SolverStatus::Timeout => {
                return Err(AssignError::Timeout {
                    solver: solver.name(),
                    limit_ms: config.solver.time_limit_ms().unwrap_or(0),
                });
            }
            status => {
                return Err(AssignError::Solver {
                    solver: solver.name(),
                    status,
                    message: solution
                        .message
                        .clone()
                        .unwrap_or_else(|| "no solution".to_string()),
                });
            }
        }

        let stamp = AuditStamp {
            at: config
                .timestamp
                .unwrap_or_else(|| Local::now().naive_local()),
            by: config.modified_by.clone(),
        };
        let roster = materialize(&problem.roster, &assignment, &solution, &stamp, solver.name())?;
        let assigned_ids = assignment.free.iter().map(|p| p.id).collect();

        info!(
            assigned = stats.free_count,
            objective = solution.objective_value,
            solve_time_ms = solution.solve_time_ms,
            "assignment complete"
        );

        Ok(AssignmentResult {
            roster,
            assigned_ids,
            objective_value: solution.objective_value,
            stats,
            solve_time_ms: solution.solve_time_ms,
            solver: solver.name(),
        })
    }

    /// Runs each configuration independently against the same problem.
    ///
    /// With the `parallel` feature the runs execute on the rayon pool.
    /// Results are returned in configuration order.
    pub fn compare(
        problem: &AssignmentProblem,
        configs: &[AssignmentConfig],
    ) -> Vec<Result<AssignmentResult, AssignError>> {
        Self::compare_with_solver(problem, configs, &MicroLpSolver)
    }

    /// [`compare`](Self::compare) with the given solver.
    pub fn compare_with_solver(
        problem: &AssignmentProblem,
        configs: &[AssignmentConfig],
        solver: &dyn MilpSolver,
    ) -> Vec<Result<AssignmentResult, AssignError>> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            configs
                .par_iter()
                .map(|config| Self::run_with_solver(problem, config, solver))
                .collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            configs
                .iter()
                .map(|config| Self::run_with_solver(problem, config, solver))
                .collect()
        }
    }
}
