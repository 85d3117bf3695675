//! Clocks the controller reads crossing time from.

use crate::core::Timestamp;
use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Source of the current crossing time.
///
/// Readings must never go backwards.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Wall-clock time in whole seconds since the Unix epoch.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let secs = Utc::now().timestamp();
        Timestamp::from_secs(u64::try_from(secs).unwrap_or(0))
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same reading, so a test can keep one handle and give
/// the other to the controller.
///
/// ```rust
/// use crossing::controller::{Clock, ManualClock};
/// use std::time::Duration;
///
/// let clock = ManualClock::starting_at(100);
/// let handle = clock.clone();
///
/// handle.advance(Duration::from_secs(601));
/// assert_eq!(clock.now().as_secs(), 701);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    secs: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(secs: u64) -> Self {
        Self {
            secs: Arc::new(AtomicU64::new(secs)),
        }
    }

    /// Move time forward, clamping at the end of representable time.
    pub fn advance(&self, by: Duration) {
        let by = by.as_secs();
        // The closure always returns Some, so the update cannot fail.
        self.secs
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |s| Some(s.saturating_add(by)))
            .ok();
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_secs(self.secs.load(Ordering::SeqCst))
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}
