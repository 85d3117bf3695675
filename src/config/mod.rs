//! Deployment configuration for a crossing controller.
//!
//! The three crossing constants are fixed at construction and never change
//! afterwards. Validation uses Stillwater's `Validation` type so a bad
//! configuration reports every violation at once instead of one per attempt.
//!
//! # Example
//!
//! ```rust
//! use crossing::config::CrossingConfig;
//!
//! let config = CrossingConfig::from_json(
//!     r#"{ "free_to_cross_secs": 600, "max_cars": 5, "pre_locked_secs": 300 }"#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.max_cars, 5);
//! assert_eq!(config.history_limit, 256);
//! assert!(config.validate().is_success());
//! ```

pub mod violations;

pub use violations::ConfigViolation;

use serde::{Deserialize, Serialize};
use std::time::Duration;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Default number of phase transitions a controller remembers.
pub const DEFAULT_HISTORY_LIMIT: usize = 256;

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

/// Crossing constants, in whole seconds and whole cars.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossingConfig {
    /// How long a `FreeToCross` phase stays valid.
    pub free_to_cross_secs: u64,

    /// Capacity of simultaneous car permissions.
    pub max_cars: usize,

    /// Grace period cars have to clear once `PreLocked` begins.
    pub pre_locked_secs: u64,

    /// Phase transitions kept in the controller's history.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl Default for CrossingConfig {
    fn default() -> Self {
        Self::new(600, 3, 60)
    }
}

impl CrossingConfig {
    pub fn new(free_to_cross_secs: u64, max_cars: usize, pre_locked_secs: u64) -> Self {
        Self {
            free_to_cross_secs,
            max_cars,
            pre_locked_secs,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    /// Override the history limit.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Parse a configuration from JSON. Missing `history_limit` takes the default.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn free_to_cross_duration(&self) -> Duration {
        Duration::from_secs(self.free_to_cross_secs)
    }

    pub fn pre_locked_duration(&self) -> Duration {
        Duration::from_secs(self.pre_locked_secs)
    }

    /// Check every constant, accumulating ALL violations.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<ConfigViolation>> {
        let checks = vec![
            positive(self.free_to_cross_secs, ConfigViolation::ZeroFreeToCrossDuration),
            positive(self.max_cars as u64, ConfigViolation::ZeroMaxCars),
            positive(self.pre_locked_secs, ConfigViolation::ZeroPreLockedDuration),
            positive(self.history_limit as u64, ConfigViolation::ZeroHistoryLimit),
        ];

        Validation::all_vec(checks).map(|_| ())
    }

    /// Same as [`validate`](Self::validate), flattened into a plain list.
    pub fn violations(&self) -> Vec<ConfigViolation> {
        match self.validate() {
            Validation::Success(_) => Vec::new(),
            Validation::Failure(errors) => errors.iter().cloned().collect(),
        }
    }
}

fn positive(value: u64, violation: ConfigViolation) -> Validation<(), NonEmptyVec<ConfigViolation>> {
    if value > 0 {
        Validation::success(())
    } else {
        Validation::fail(violation)
    }
}
