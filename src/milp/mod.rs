//! Mixed-integer linear programming (MILP) layer.
//!
//! Provides a solver-independent model for linear problems over binary and
//! continuous variables, and a pluggable solver interface.
//!
//! # Key Components
//!
//! - **Variables**: [`Variable`] addressed by [`VarId`], binary or continuous
//! - **Constraints**: [`LinearConstraint`], `expr (<=|>=|==) rhs`
//! - **Model**: [`MilpModel`], a container for variables, constraints, objective
//! - **Solver**: [`MilpSolver`] trait, with [`MicroLpSolver`] as the default
//!   backend
//!
//! # Design
//!
//! This module knows nothing about rosters or groups. The assignment
//! layer builds a [`MilpModel`] and hands it to any [`MilpSolver`]; the
//! search algorithm (branch-and-bound, simplex) lives entirely behind the
//! trait.

mod model;
mod solver;
mod variables;

pub use model::{LinearConstraint, LinearExpr, MilpModel, Objective, Relation};
pub use solver::{MicroLpSolver, MilpSolution, MilpSolver, SolverConfig, SolverStatus};
pub use variables::{VarId, VarKind, Variable};
