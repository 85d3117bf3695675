//! Configuration violations.

use thiserror::Error;

/// A single reason a crossing configuration cannot be deployed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigViolation {
    #[error("free-to-cross duration must be positive")]
    ZeroFreeToCrossDuration,

    #[error("max cars must be at least one")]
    ZeroMaxCars,

    #[error("pre-locked grace period must be positive")]
    ZeroPreLockedDuration,

    #[error("history limit must be at least one")]
    ZeroHistoryLimit,
}
