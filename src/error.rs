//! Error types.

use crate::milp::SolverStatus;
use crate::settings::SettingsError;
use thiserror::Error;

/// Failure of an assignment run.
///
/// Every variant leaves the caller's roster untouched: a run either
/// places every free person or returns one of these.
#[derive(Debug, Error)]
pub enum AssignError {
    /// Input is incomplete or out of range. Raised before any variable is
    /// declared.
    #[error("validation failed for {}: {field}: {message}", describe_record(.record))]
    Validation {
        /// Roster id of the offending record, `None` for group or weight input.
        record: Option<usize>,
        field: &'static str,
        message: String,
    },

    /// No assignment satisfies the capacity and age rules.
    #[error("no feasible assignment for {free} free persons (free capacity {capacity})")]
    Infeasible { free: usize, capacity: i64 },

    /// The solver failed, or returned a solution that cannot be applied.
    #[error("solver '{solver}' failed with status {status:?}: {message}")]
    Solver {
        solver: &'static str,
        status: SolverStatus,
        message: String,
    },

    /// The solver did not finish within the configured limit.
    #[error("solver '{solver}' timed out after {limit_ms} ms")]
    Timeout { solver: &'static str, limit_ms: u64 },

    #[error(transparent)]
    Settings(#[from] SettingsError),
}

impl AssignError {
    pub(crate) fn validation(
        record: Option<usize>,
        field: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self::Validation {
            record,
            field,
            message: message.into(),
        }
    }

    /// Whether this error reports business infeasibility.
    pub fn is_infeasible(&self) -> bool {
        matches!(self, Self::Infeasible { .. })
    }
}

fn describe_record(record: &Option<usize>) -> String {
    match record {
        Some(id) => format!("record {id}"),
        None => "configuration".to_string(),
    }
}
