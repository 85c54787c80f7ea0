//! Assignment configuration.

use crate::error::AssignError;
use crate::milp::SolverConfig;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Audit label written to `modified_by` on every record placed by a run.
pub const DEFAULT_MODIFIED_BY: &str = "Optimization algorithm";

/// Weights of the objective terms.
///
/// # Objective
///
/// ```text
///   points_weight · Σ points(i) · assign[i,j]
/// − gender_balance_weight · gender_penalty_scale · Σ gender_gap[k,j]
/// − age_balance_weight · age_penalty_scale · Σ age_gap[j]
/// ```
///
/// A balance weight of zero removes that term's helper variables and
/// constraints from the model altogether. `age_distribution_weight` is
/// accepted and validated but contributes no term.
///
/// # Examples
///
/// ```
/// use u_allot::assign::WeightConfig;
///
/// let weights = WeightConfig::default()
///     .with_points_weight(5.0)
///     .with_gender_balance_weight(5.0)
///     .with_age_balance_weight(5.0);
/// assert!(weights.validate().is_ok());
/// assert!(weights.gender_balance_active());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightConfig {
    pub points_weight: f64,
    pub age_distribution_weight: f64,
    pub gender_balance_weight: f64,
    pub age_balance_weight: f64,
    /// Multiplier on the gender-gap penalty.
    pub gender_penalty_scale: f64,
    /// Multiplier on the age-gap penalty.
    pub age_penalty_scale: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            points_weight: 1.0,
            age_distribution_weight: 0.0,
            gender_balance_weight: 0.0,
            age_balance_weight: 0.0,
            gender_penalty_scale: 1.0,
            age_penalty_scale: 1.0,
        }
    }
}

impl WeightConfig {
    pub fn with_points_weight(mut self, w: f64) -> Self {
        self.points_weight = w;
        self
    }

    pub fn with_age_distribution_weight(mut self, w: f64) -> Self {
        self.age_distribution_weight = w;
        self
    }

    pub fn with_gender_balance_weight(mut self, w: f64) -> Self {
        self.gender_balance_weight = w;
        self
    }

    pub fn with_age_balance_weight(mut self, w: f64) -> Self {
        self.age_balance_weight = w;
        self
    }

    pub fn with_gender_penalty_scale(mut self, s: f64) -> Self {
        self.gender_penalty_scale = s;
        self
    }

    pub fn with_age_penalty_scale(mut self, s: f64) -> Self {
        self.age_penalty_scale = s;
        self
    }

    /// Whether gender-gap helpers and constraints are generated.
    pub fn gender_balance_active(&self) -> bool {
        self.gender_balance_weight > 0.0
    }

    /// Whether age-gap helpers and constraints are generated.
    pub fn age_balance_active(&self) -> bool {
        self.age_balance_weight > 0.0
    }

    /// Validates that every weight and scale is finite and non-negative.
    pub fn validate(&self) -> Result<(), AssignError> {
        let fields: [(&'static str, f64); 6] = [
            ("points_weight", self.points_weight),
            ("age_distribution_weight", self.age_distribution_weight),
            ("gender_balance_weight", self.gender_balance_weight),
            ("age_balance_weight", self.age_balance_weight),
            ("gender_penalty_scale", self.gender_penalty_scale),
            ("age_penalty_scale", self.age_penalty_scale),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(AssignError::validation(
                    None,
                    field,
                    format!("must be a non-negative number, got {value}"),
                ));
            }
        }
        Ok(())
    }
}

/// Configuration for one assignment run.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_allot::assign::{AssignmentConfig, WeightConfig};
///
/// let config = AssignmentConfig::default()
///     .with_weights(WeightConfig::default().with_gender_balance_weight(2.0))
///     .with_time_limit(Duration::from_secs(10))
///     .with_modified_by("planner");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct AssignmentConfig {
    /// Objective weights.
    pub weights: WeightConfig,

    /// Options passed through to the solver.
    pub solver: SolverConfig,

    /// Value written to `modified_by` on assigned records.
    pub modified_by: String,

    /// Value written to `modified_at`. `None` uses the local time when the
    /// run finishes.
    pub timestamp: Option<NaiveDateTime>,

    /// Date used to derive ages from birth dates. `None` uses today.
    pub reference_date: Option<NaiveDate>,
}

impl Default for AssignmentConfig {
    fn default() -> Self {
        Self {
            weights: WeightConfig::default(),
            solver: SolverConfig::default(),
            modified_by: DEFAULT_MODIFIED_BY.to_string(),
            timestamp: None,
            reference_date: None,
        }
    }
}

impl AssignmentConfig {
    pub fn with_weights(mut self, weights: WeightConfig) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.solver.time_limit = Some(limit);
        self
    }

    pub fn with_modified_by(mut self, label: impl Into<String>) -> Self {
        self.modified_by = label.into();
        self
    }

    pub fn with_timestamp(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), AssignError> {
        self.weights.validate()?;
        if self.modified_by.trim().is_empty() {
            return Err(AssignError::validation(None, "modified_by", "must not be empty"));
        }
        Ok(())
    }
}
