//! Crossing time.
//!
//! Timestamps are whole seconds, the resolution a block timestamp offers.
//! Both crossing timers share the same deadline rule: a window opened at
//! `since` with length `duration` has expired once `now > since + duration`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// A point in crossing time, in whole seconds.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The unset timestamp.
    pub const ZERO: Timestamp = Timestamp(0);

    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    pub const fn as_secs(&self) -> u64 {
        self.0
    }

    /// Add a duration, clamping at the end of representable time.
    ///
    /// Sub-second parts of `duration` are ignored.
    pub fn saturating_add(self, duration: Duration) -> Self {
        Self(self.0.saturating_add(duration.as_secs()))
    }

    /// Time elapsed since `earlier`, or zero if `earlier` is in the future.
    pub fn saturating_since(self, earlier: Timestamp) -> Duration {
        Duration::from_secs(self.0.saturating_sub(earlier.0))
    }

    /// Whether a window opened at `since` lasting `duration` has run out.
    ///
    /// The boundary instant itself is still inside the window.
    ///
    /// ```rust
    /// use crossing::core::Timestamp;
    /// use std::time::Duration;
    ///
    /// let since = Timestamp::from_secs(1_000);
    /// let window = Duration::from_secs(600);
    ///
    /// assert!(!Timestamp::from_secs(1_600).has_expired(since, window));
    /// assert!(Timestamp::from_secs(1_601).has_expired(since, window));
    /// ```
    pub fn has_expired(self, since: Timestamp, duration: Duration) -> bool {
        self > since.saturating_add(duration)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={}s", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_boundary_is_inclusive() {
        let since = Timestamp::from_secs(10);
        let window = Duration::from_secs(5);

        assert!(!Timestamp::from_secs(10).has_expired(since, window));
        assert!(!Timestamp::from_secs(15).has_expired(since, window));
        assert!(Timestamp::from_secs(16).has_expired(since, window));
    }

    #[test]
    fn deadline_never_overflows() {
        let since = Timestamp::from_secs(u64::MAX - 1);
        let window = Duration::from_secs(600);

        assert_eq!(since.saturating_add(window), Timestamp::from_secs(u64::MAX));
        assert!(!Timestamp::from_secs(u64::MAX).has_expired(since, window));
    }

    #[test]
    fn saturating_since_clamps_to_zero() {
        let earlier = Timestamp::from_secs(100);
        assert_eq!(
            Timestamp::from_secs(40).saturating_since(earlier),
            Duration::ZERO
        );
        assert_eq!(
            Timestamp::from_secs(140).saturating_since(earlier),
            Duration::from_secs(40)
        );
    }

    #[test]
    fn sub_second_durations_are_truncated() {
        let since = Timestamp::from_secs(0);
        assert_eq!(
            since.saturating_add(Duration::from_millis(1_999)),
            Timestamp::from_secs(1)
        );
    }
}
