//! Group definitions.

use crate::error::AssignError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A capacity-limited group with optional inclusive age bounds.
///
/// # Examples
///
/// ```
/// use u_allot::roster::GroupDefinition;
///
/// let group = GroupDefinition::new("Igel", 5).with_age_range(-5, 5);
/// assert!(group.admits_age(0));
/// assert!(!group.admits_age(6));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDefinition {
    /// Unique group name.
    pub name: String,
    /// Maximum number of members, fixed and newly assigned together.
    pub capacity: u32,
    /// Minimum age (inclusive).
    #[serde(default)]
    pub min_age: Option<i32>,
    /// Maximum age (inclusive).
    #[serde(default)]
    pub max_age: Option<i32>,
}

impl GroupDefinition {
    /// Creates a group without age bounds.
    pub fn new(name: impl Into<String>, capacity: u32) -> Self {
        Self {
            name: name.into(),
            capacity,
            min_age: None,
            max_age: None,
        }
    }

    pub fn with_min_age(mut self, min_age: i32) -> Self {
        self.min_age = Some(min_age);
        self
    }

    pub fn with_max_age(mut self, max_age: i32) -> Self {
        self.max_age = Some(max_age);
        self
    }

    pub fn with_age_range(self, min_age: i32, max_age: i32) -> Self {
        self.with_min_age(min_age).with_max_age(max_age)
    }

    /// Whether a person of `age` may join this group.
    pub fn admits_age(&self, age: i32) -> bool {
        self.min_age.map_or(true, |min| age >= min) && self.max_age.map_or(true, |max| age <= max)
    }
}

/// Checks that group names are non-empty and unique.
///
/// Groups whose bounds exclude every age (`min_age > max_age`) are legal:
/// nobody can be assigned to them.
pub fn validate_groups(groups: &[GroupDefinition]) -> Result<(), AssignError> {
    let mut seen = HashSet::with_capacity(groups.len());
    for group in groups {
        if group.name.trim().is_empty() {
            return Err(AssignError::validation(None, "group.name", "must not be empty"));
        }
        if !seen.insert(group.name.as_str()) {
            return Err(AssignError::validation(
                None,
                "group.name",
                format!("duplicate group '{}'", group.name),
            ));
        }
    }
    Ok(())
}
