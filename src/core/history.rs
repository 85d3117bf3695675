//! Phase transition history tracking.
//!
//! Records every phase change together with the crossing time it happened
//! at and what caused it. The history is bounded so a controller that runs
//! for the life of a deployment does not grow without limit.

use super::phase::Phase;
use super::time::Timestamp;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Why a phase change happened.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum TransitionCause {
    /// The infrastructure operator reset the crossing to `FreeToCross`.
    OperatorReset,
    /// The free-to-cross validity window ran out.
    FreeToCrossExpired,
    /// Every car released its permission while the crossing was pre-locked.
    CarsCleared,
}

/// Record of a single phase change.
///
/// # Example
///
/// ```rust
/// use crossing::core::{Phase, PhaseTransition, Timestamp, TransitionCause};
///
/// let transition = PhaseTransition {
///     from: Phase::Locked,
///     to: Phase::FreeToCross,
///     at: Timestamp::from_secs(42),
///     cause: TransitionCause::OperatorReset,
/// };
/// assert_eq!(transition.to, Phase::FreeToCross);
/// ```
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct PhaseTransition {
    /// The phase being left
    pub from: Phase,
    /// The phase being entered
    pub to: Phase,
    /// Crossing time of the change
    pub at: Timestamp,
    /// What triggered the change
    pub cause: TransitionCause,
}

/// Ordered, bounded history of phase transitions.
///
/// Once `limit` entries are held, recording a new transition evicts the
/// oldest one.
///
/// # Example
///
/// ```rust
/// use crossing::core::{Phase, PhaseHistory, PhaseTransition, Timestamp, TransitionCause};
///
/// let mut history = PhaseHistory::new(8);
///
/// history.record(PhaseTransition {
///     from: Phase::Locked,
///     to: Phase::FreeToCross,
///     at: Timestamp::from_secs(0),
///     cause: TransitionCause::OperatorReset,
/// });
/// history.record(PhaseTransition {
///     from: Phase::FreeToCross,
///     to: Phase::PreLocked,
///     at: Timestamp::from_secs(601),
///     cause: TransitionCause::FreeToCrossExpired,
/// });
///
/// let path = history.get_path();
/// assert_eq!(path, vec![Phase::Locked, Phase::FreeToCross, Phase::PreLocked]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PhaseHistory {
    transitions: VecDeque<PhaseTransition>,
    limit: usize,
    evicted: u64,
}

impl PhaseHistory {
    /// Create an empty history holding at most `limit` transitions.
    ///
    /// A limit of zero is treated as one.
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            transitions: VecDeque::with_capacity(limit.min(64)),
            limit,
            evicted: 0,
        }
    }

    /// Record a transition, evicting the oldest entry when full.
    pub fn record(&mut self, transition: PhaseTransition) {
        while self.transitions.len() >= self.limit {
            if self.transitions.pop_front().is_none() {
                break;
            }
            self.evicted += 1;
        }
        self.transitions.push_back(transition);
    }

    /// Re-home the retained transitions in a history bounded by `limit`,
    /// keeping the newest ones.
    ///
    /// Used when a history arrives from outside, e.g. a decoded checkpoint,
    /// whose own limit cannot be trusted.
    pub fn rebound(self, limit: usize) -> Self {
        let mut history = Self::new(limit);
        history.evicted = self.evicted;
        for transition in self.transitions {
            history.record(transition);
        }
        history
    }

    /// Get the path of phases traversed.
    ///
    /// Returns the `from` phase of the oldest retained transition followed
    /// by the `to` phase of each transition.
    pub fn get_path(&self) -> Vec<Phase> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.front() {
            path.push(first.from);
        }
        path.extend(self.transitions.iter().map(|t| t.to));
        path
    }

    /// Crossing time spanned from the oldest to the newest retained transition.
    ///
    /// Returns `None` if nothing has been recorded.
    pub fn duration(&self) -> Option<Duration> {
        match (self.transitions.front(), self.transitions.back()) {
            (Some(first), Some(last)) => Some(last.at.saturating_since(first.at)),
            _ => None,
        }
    }

    /// Retained transitions, oldest first.
    pub fn transitions(&self) -> impl Iterator<Item = &PhaseTransition> {
        self.transitions.iter()
    }

    pub fn last(&self) -> Option<&PhaseTransition> {
        self.transitions.back()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Number of transitions dropped to stay within the limit.
    pub fn evicted(&self) -> u64 {
        self.evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transition(from: Phase, to: Phase, at: u64) -> PhaseTransition {
        PhaseTransition {
            from,
            to,
            at: Timestamp::from_secs(at),
            cause: TransitionCause::OperatorReset,
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history = PhaseHistory::new(4);
        assert!(history.is_empty());
        assert!(history.get_path().is_empty());
        assert!(history.duration().is_none());
        assert!(history.last().is_none());
    }

    #[test]
    fn record_adds_transition() {
        let mut history = PhaseHistory::new(4);
        history.record(transition(Phase::Locked, Phase::FreeToCross, 0));

        assert_eq!(history.len(), 1);
        assert_eq!(history.last().map(|t| t.to), Some(Phase::FreeToCross));
    }

    #[test]
    fn get_path_returns_phase_sequence() {
        let mut history = PhaseHistory::new(4);
        history.record(transition(Phase::Locked, Phase::FreeToCross, 0));
        history.record(transition(Phase::FreeToCross, Phase::Locked, 700));

        assert_eq!(
            history.get_path(),
            vec![Phase::Locked, Phase::FreeToCross, Phase::Locked]
        );
    }

    #[test]
    fn duration_spans_first_to_last() {
        let mut history = PhaseHistory::new(4);
        history.record(transition(Phase::Locked, Phase::FreeToCross, 100));
        history.record(transition(Phase::FreeToCross, Phase::PreLocked, 701));

        assert_eq!(history.duration(), Some(Duration::from_secs(601)));
    }

    #[test]
    fn single_transition_has_duration_zero() {
        let mut history = PhaseHistory::new(4);
        history.record(transition(Phase::Locked, Phase::FreeToCross, 9));

        assert_eq!(history.duration(), Some(Duration::ZERO));
    }

    #[test]
    fn oldest_entries_are_evicted_at_limit() {
        let mut history = PhaseHistory::new(2);
        history.record(transition(Phase::Locked, Phase::FreeToCross, 1));
        history.record(transition(Phase::FreeToCross, Phase::Locked, 2));
        history.record(transition(Phase::Locked, Phase::FreeToCross, 3));

        assert_eq!(history.len(), 2);
        assert_eq!(history.evicted(), 1);
        let times: Vec<u64> = history.transitions().map(|t| t.at.as_secs()).collect();
        assert_eq!(times, vec![2, 3]);
    }

    #[test]
    fn zero_limit_keeps_one_entry() {
        let mut history = PhaseHistory::new(0);
        history.record(transition(Phase::Locked, Phase::FreeToCross, 1));
        history.record(transition(Phase::FreeToCross, Phase::Locked, 2));

        assert_eq!(history.limit(), 1);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn rebound_trims_to_new_limit() {
        let mut history = PhaseHistory::new(8);
        for at in 1..=5 {
            history.record(transition(Phase::Locked, Phase::FreeToCross, at));
        }

        let history = history.rebound(2);

        assert_eq!(history.limit(), 2);
        assert_eq!(history.len(), 2);
        assert_eq!(history.evicted(), 3);
        let times: Vec<u64> = history.transitions().map(|t| t.at.as_secs()).collect();
        assert_eq!(times, vec![4, 5]);
    }

    #[test]
    fn decoded_zero_limit_stays_bounded_after_rebound() {
        let json = r#"{"transitions":[],"limit":0,"evicted":0}"#;
        let decoded: PhaseHistory = serde_json::from_str(json).unwrap();
        let mut history = decoded.rebound(3);

        for at in 0..10 {
            history.record(transition(Phase::Locked, Phase::FreeToCross, at));
        }
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn history_serializes_correctly() {
        let mut history = PhaseHistory::new(4);
        history.record(transition(Phase::Locked, Phase::FreeToCross, 5));

        let json = serde_json::to_string(&history).unwrap();
        let deserialized: PhaseHistory = serde_json::from_str(&json).unwrap();

        assert_eq!(history.len(), deserialized.len());
        assert_eq!(history.last(), deserialized.last());
    }
}
