//! Roster to group assignment as a MILP.
//!
//! # Pipeline
//!
//! 1. [`declare`]: validate input, partition the roster into fixed and
//!    free persons, declare `assign[i,j]` and any balance helpers
//! 2. [`constraints`]: single assignment, capacity, age eligibility and the
//!    absolute-value linearizations of the balance terms
//! 3. [`objective`]: points reward minus weighted balance penalties
//! 4. A [`MilpSolver`](crate::milp::MilpSolver) solves the model
//! 5. [`materialize`]: copy the roster and stamp every placed record
//!
//! [`AssignmentRunner`] drives the whole pipeline.
//!
//! # Hard rules
//!
//! - Every free person lands in exactly one group
//! - Fixed occupants plus newcomers never exceed a group's capacity
//! - Nobody joins a group whose age bounds exclude them
//!
//! Fixed persons are never moved. If no assignment satisfies the rules,
//! the run fails as a whole and no record changes.

mod builder;
mod config;
pub mod constraints;
mod materialize;
pub mod objective;
mod runner;

pub use builder::{build_model, declare, AssignmentModel, ModelStats};
pub use config::{AssignmentConfig, WeightConfig, DEFAULT_MODIFIED_BY};
pub use materialize::{materialize, AuditStamp};
pub use runner::{AssignmentProblem, AssignmentResult, AssignmentRunner};
