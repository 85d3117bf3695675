//! Core crossing types.
//!
//! This module contains the pure part of the controller:
//! - The `Phase` enum and its predicates
//! - Crossing time and the deadline rule shared by both timers
//! - Caller identities
//! - Bounded phase history
//!
//! Nothing in this module reads a clock or emits events.

mod history;
mod identity;
mod phase;
mod time;

pub use history::{PhaseHistory, PhaseTransition, TransitionCause};
pub use identity::Identity;
pub use phase::Phase;
pub use time::Timestamp;
