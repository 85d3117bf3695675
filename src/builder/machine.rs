//! Builder for deploying crossing controllers.

use crate::builder::error::BuildError;
use crate::config::CrossingConfig;
use crate::controller::{Clock, CrossingController, EventLog, EventSink, SystemClock};
use crate::core::Identity;
use std::time::Duration;

/// Builder for constructing crossing controllers with a fluent API.
///
/// Defaults to the wall clock and an in-memory [`EventLog`].
///
/// # Example
///
/// ```rust
/// use crossing::builder::ControllerBuilder;
/// use crossing::controller::ManualClock;
/// use crossing::core::{Identity, Phase};
/// use std::time::Duration;
///
/// let crossing = ControllerBuilder::new()
///     .operator(Identity::from("operator"))
///     .free_to_cross(Duration::from_secs(600))
///     .max_cars(5)
///     .pre_locked(Duration::from_secs(300))
///     .clock(ManualClock::new())
///     .build()
///     .unwrap();
///
/// assert_eq!(crossing.phase(), Phase::Locked);
/// ```
pub struct ControllerBuilder<C: Clock = SystemClock, E: EventSink = EventLog> {
    operator: Option<Identity>,
    config: CrossingConfig,
    clock: C,
    sink: E,
}

impl ControllerBuilder {
    /// Create a new builder with the default configuration.
    pub fn new() -> Self {
        Self {
            operator: None,
            config: CrossingConfig::default(),
            clock: SystemClock,
            sink: EventLog::new(),
        }
    }
}

impl Default for ControllerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock, E: EventSink> ControllerBuilder<C, E> {
    /// Set the infrastructure operator (required).
    pub fn operator(mut self, operator: Identity) -> Self {
        self.operator = Some(operator);
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: CrossingConfig) -> Self {
        self.config = config;
        self
    }

    /// Load the configuration from JSON.
    pub fn config_json(self, json: &str) -> Result<Self, BuildError> {
        let config =
            CrossingConfig::from_json(json).map_err(|e| BuildError::Config(e.to_string()))?;
        Ok(self.config(config))
    }

    /// Validity window of the free-to-cross phase. Whole seconds only.
    pub fn free_to_cross(mut self, duration: Duration) -> Self {
        self.config.free_to_cross_secs = duration.as_secs();
        self
    }

    pub fn max_cars(mut self, max_cars: usize) -> Self {
        self.config.max_cars = max_cars;
        self
    }

    /// Grace period cars have to clear. Whole seconds only.
    pub fn pre_locked(mut self, duration: Duration) -> Self {
        self.config.pre_locked_secs = duration.as_secs();
        self
    }

    pub fn history_limit(mut self, limit: usize) -> Self {
        self.config.history_limit = limit;
        self
    }

    /// Swap in another clock.
    pub fn clock<C2: Clock>(self, clock: C2) -> ControllerBuilder<C2, E> {
        ControllerBuilder {
            operator: self.operator,
            config: self.config,
            clock,
            sink: self.sink,
        }
    }

    /// Swap in another event sink.
    pub fn sink<E2: EventSink>(self, sink: E2) -> ControllerBuilder<C, E2> {
        ControllerBuilder {
            operator: self.operator,
            config: self.config,
            clock: self.clock,
            sink,
        }
    }

    /// Deploy the controller.
    /// Returns an error if the operator is missing or the configuration is invalid.
    pub fn build(self) -> Result<CrossingController<C, E>, BuildError> {
        let operator = self.operator.ok_or(BuildError::MissingOperator)?;
        CrossingController::new(operator, self.config, self.clock, self.sink)
    }
}
