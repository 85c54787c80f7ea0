//! Optimizer settings loaded from TOML.
//!
//! # Examples
//!
//! ```
//! use u_allot::settings::OptimizerSettings;
//!
//! let settings = OptimizerSettings::from_toml_str(r#"
//!     modified_by = "Kita Sonnenschein"
//!
//!     [weights]
//!     gender_balance_weight = 2.0
//!
//!     [solver]
//!     time_limit_secs = 30
//!
//!     [[groups]]
//!     name = "Igel"
//!     capacity = 12
//!     min_age = 1
//!     max_age = 3
//!
//!     [[groups]]
//!     name = "Bären"
//!     capacity = 20
//!     min_age = 3
//! "#).unwrap();
//!
//! assert_eq!(settings.groups.len(), 2);
//! let config = settings.assignment_config();
//! assert_eq!(config.solver.time_limit_ms(), Some(30_000));
//! ```
//!
//! Fall back to the defaults when no file exists:
//!
//! ```
//! use u_allot::settings::OptimizerSettings;
//!
//! let settings = OptimizerSettings::load_or_default("no-such-allot.toml").unwrap();
//! assert_eq!(settings.groups.len(), 3);
//! ```

use crate::assign::{AssignmentConfig, AssignmentProblem, WeightConfig, DEFAULT_MODIFIED_BY};
use crate::milp::SolverConfig;
use crate::roster::{validate_groups, GroupDefinition, PersonRecord};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Settings error
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid settings: {0}")]
    Invalid(String),
}

/// Solver section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// Wall-clock limit for one solve.
    pub time_limit_secs: Option<u64>,
}

impl SolverSettings {
    pub fn solver_config(&self) -> SolverConfig {
        match self.time_limit_secs {
            Some(secs) => SolverConfig::default().with_time_limit(Duration::from_secs(secs)),
            None => SolverConfig::default(),
        }
    }
}

/// Everything needed to run the optimizer except the roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerSettings {
    /// Audit label for assigned records.
    pub modified_by: String,

    /// Objective weights.
    pub weights: WeightConfig,

    pub solver: SolverSettings,

    /// Groups to fill, in display order.
    pub groups: Vec<GroupDefinition>,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            modified_by: DEFAULT_MODIFIED_BY.to_string(),
            weights: WeightConfig::default(),
            solver: SolverSettings::default(),
            groups: default_groups(),
        }
    }
}

/// Igel, Mäuse and Bären, five seats each, ages −5 to 5.
pub fn default_groups() -> Vec<GroupDefinition> {
    ["Igel", "Mäuse", "Bären"]
        .into_iter()
        .map(|name| GroupDefinition::new(name, 5).with_age_range(-5, 5))
        .collect()
}

impl OptimizerSettings {
    /// Loads and validates settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let settings = Self::from_toml_file(path)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Like [`load`](Self::load), but returns the defaults if the file does
    /// not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "settings file not found, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Parses settings from a TOML file without validating them.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses settings from a TOML string without validating them.
    pub fn from_toml_str(s: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(s)?)
    }

    /// Serializes the settings back to TOML.
    pub fn to_toml_string(&self) -> Result<String, SettingsError> {
        toml::to_string_pretty(self).map_err(|e| SettingsError::Invalid(e.to_string()))
    }

    /// Checks groups, weights and the audit label.
    pub fn validate(&self) -> Result<(), SettingsError> {
        validate_groups(&self.groups).map_err(|e| SettingsError::Invalid(e.to_string()))?;
        self.assignment_config()
            .validate()
            .map_err(|e| SettingsError::Invalid(e.to_string()))
    }

    /// Run configuration derived from these settings.
    pub fn assignment_config(&self) -> AssignmentConfig {
        AssignmentConfig::default()
            .with_weights(self.weights.clone())
            .with_solver(self.solver.solver_config())
            .with_modified_by(self.modified_by.clone())
    }

    /// Pairs a roster with the configured groups.
    pub fn problem(&self, roster: Vec<PersonRecord>) -> AssignmentProblem {
        AssignmentProblem::new(roster, self.groups.clone())
    }
}
