//! Capacity-limited group assignment as a mixed-integer linear program.
//!
//! Takes a roster of people, some already in a group and some free, and a
//! set of groups with capacities and optional age bounds. Every free
//! person is placed in exactly one group so that:
//!
//! - no group exceeds its capacity, counting the people already in it
//! - nobody lands in a group whose age bounds exclude them
//! - genders are balanced per age class and group, if weighted
//! - age classes are balanced per group, if weighted
//!
//! # Modules
//!
//! - [`roster`]: person records, group definitions, age derivation
//! - [`milp`]: solver-independent MILP model and the [`milp::MilpSolver`]
//!   trait with a pure-Rust backend
//! - [`assign`]: model building, constraints, objective, solution write-back,
//!   and the [`assign::AssignmentRunner`] entry point
//! - [`report`]: group distributions and occupancy for display
//! - [`settings`]: TOML-backed group and weight configuration
//! - [`logging`]: `tracing` subscriber setup
//!
//! # Example
//!
//! ```
//! use u_allot::assign::{AssignmentConfig, AssignmentProblem, AssignmentRunner, WeightConfig};
//! use u_allot::roster::{Gender, GroupDefinition, PersonRecord};
//!
//! let roster = vec![
//!     PersonRecord::new(0, "Mia", "Keller").with_age(3).with_gender(Gender::Female).with_points(4.0),
//!     PersonRecord::new(1, "Ben", "Maier").with_age(3).with_gender(Gender::Male).with_points(2.0),
//!     PersonRecord::new(2, "Ida", "Roth").with_age(3).with_gender(Gender::Female).with_points(1.0),
//!     PersonRecord::new(3, "Leo", "Wolf").with_age(3).with_gender(Gender::Male).with_points(6.0),
//! ];
//! let groups = vec![GroupDefinition::new("Igel", 2), GroupDefinition::new("Bären", 2)];
//! let problem = AssignmentProblem::new(roster, groups);
//! let config = AssignmentConfig::default()
//!     .with_weights(WeightConfig::default().with_gender_balance_weight(1.0));
//!
//! let result = AssignmentRunner::run(&problem, &config).unwrap();
//! for group in ["Igel", "Bären"] {
//!     let girls = result
//!         .roster
//!         .iter()
//!         .filter(|r| r.group.as_deref() == Some(group) && r.gender == Some(Gender::Female))
//!         .count();
//!     assert_eq!(girls, 1);
//! }
//! ```

pub mod assign;
pub mod error;
pub mod logging;
pub mod milp;
pub mod report;
pub mod roster;
pub mod settings;

pub use assign::{AssignmentConfig, AssignmentProblem, AssignmentResult, AssignmentRunner, WeightConfig};
pub use error::AssignError;
pub use roster::{Gender, GroupDefinition, PersonRecord};
