//! Roster data model.
//!
//! - [`PersonRecord`]: one roster row, free while `group` is `None`
//! - [`GroupDefinition`]: a named group with capacity and age bounds
//! - Age derivation from birth dates, negative before birth

mod age;
mod group;
mod types;

pub use age::{age_on, age_today, parse_birth_date, BIRTH_DATE_FORMAT};
pub use group::{validate_groups, GroupDefinition};
pub use types::{derive_ages, Gender, PersonRecord, ResolvedPerson};
