//! Crossing phase.
//!
//! The phase is the crossing's current safety state. All methods are pure
//! and describe what the phase permits without touching any controller state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The crossing's current safety state.
///
/// # Example
///
/// ```rust
/// use crossing::core::Phase;
///
/// assert!(Phase::FreeToCross.admits_cars());
/// assert!(!Phase::PreLocked.admits_cars());
/// assert_eq!(Phase::default(), Phase::Locked);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Cars may request permission; the validity window has not yet run out.
    FreeToCross,
    /// No car may cross and no car holds permission.
    #[default]
    Locked,
    /// Locking is underway but at least one car still holds permission.
    /// The grace period is running.
    PreLocked,
}

impl Phase {
    /// Get the phase's name for display/logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::FreeToCross => "FreeToCross",
            Self::Locked => "Locked",
            Self::PreLocked => "PreLocked",
        }
    }

    /// Whether new car permissions may be granted in this phase.
    pub fn admits_cars(&self) -> bool {
        matches!(self, Self::FreeToCross)
    }

    /// Whether the crossing is locked or on its way to being locked.
    pub fn is_locking(&self) -> bool {
        matches!(self, Self::Locked | Self::PreLocked)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
