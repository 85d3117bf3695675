//! The crossing controller.

use crate::builder::BuildError;
use crate::config::CrossingConfig;
use crate::controller::clock::Clock;
use crate::controller::error::CrossingError;
use crate::controller::events::{CrossingEvent, EventSink};
use crate::core::{Identity, Phase, PhaseHistory, PhaseTransition, Timestamp, TransitionCause};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Outcome of a train crossing request from an authorized train.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrainSignal {
    /// Passage granted.
    Proceed,
    /// The grace period lapsed while cars may still be on the crossing.
    Stop,
}

impl TrainSignal {
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Proceed)
    }
}

/// Level-crossing safety controller.
///
/// Owns the phase, both timers, the authorized train set and the car
/// permission set. Time-driven transitions are never scheduled; every car
/// or train request first works out whether a timer has run out since the
/// last call. Until somebody calls, [`phase`](Self::phase) can be stale.
///
/// Every operation is all-or-nothing. A pending timer transition is
/// committed only by a request that succeeds.
///
/// # Example
///
/// ```rust
/// use crossing::config::CrossingConfig;
/// use crossing::controller::{CrossingController, EventLog, ManualClock, TrainSignal};
/// use crossing::core::{Identity, Phase};
/// use std::time::Duration;
///
/// let operator = Identity::from("operator");
/// let clock = ManualClock::new();
/// let mut crossing = CrossingController::new(
///     operator.clone(),
///     CrossingConfig::new(600, 5, 300),
///     clock.clone(),
///     EventLog::new(),
/// )
/// .unwrap();
///
/// crossing.update_free_to_cross_state(&operator).unwrap();
/// crossing.request_car_permission(&Identity::from("car")).unwrap();
///
/// let train = Identity::from("train");
/// crossing.authorize_train(&operator, &train).unwrap();
///
/// clock.advance(Duration::from_secs(601));
/// assert_eq!(crossing.request_train_crossing(&train), Ok(TrainSignal::Proceed));
/// assert_eq!(crossing.phase(), Phase::PreLocked);
///
/// clock.advance(Duration::from_secs(301));
/// assert_eq!(crossing.request_train_crossing(&train), Ok(TrainSignal::Stop));
/// ```
pub struct CrossingController<C: Clock, E: EventSink> {
    pub(crate) operator: Identity,
    pub(crate) config: CrossingConfig,
    pub(crate) phase: Phase,
    pub(crate) free_to_cross_since: Timestamp,
    pub(crate) pre_locked_since: Timestamp,
    pub(crate) authorized_trains: HashSet<Identity>,
    pub(crate) cars_with_permission: HashSet<Identity>,
    pub(crate) history: PhaseHistory,
    pub(crate) clock: C,
    pub(crate) sink: E,
}

impl<C: Clock, E: EventSink> CrossingController<C, E> {
    /// Deploy a controller with `operator` as the infrastructure operator.
    ///
    /// Starts `Locked` with both timers unset. Fails if any configured
    /// constant is zero.
    pub fn new(
        operator: Identity,
        config: CrossingConfig,
        clock: C,
        sink: E,
    ) -> Result<Self, BuildError> {
        let violations = config.violations();
        if !violations.is_empty() {
            return Err(BuildError::InvalidConfig(violations));
        }

        info!(
            operator = %operator,
            free_to_cross_secs = config.free_to_cross_secs,
            max_cars = config.max_cars,
            pre_locked_secs = config.pre_locked_secs,
            "crossing controller deployed"
        );

        Ok(Self {
            operator,
            history: PhaseHistory::new(config.history_limit),
            config,
            phase: Phase::Locked,
            free_to_cross_since: Timestamp::ZERO,
            pre_locked_since: Timestamp::ZERO,
            authorized_trains: HashSet::new(),
            cars_with_permission: HashSet::new(),
            clock,
            sink,
        })
    }

    // ── operator operations ──────────────────────────────────────────────

    /// Allow `train` to request crossings. No-op if already authorized.
    pub fn authorize_train(&mut self, caller: &Identity, train: &Identity) -> Result<(), CrossingError> {
        self.ensure_operator(caller)?;
        if self.authorized_trains.insert(train.clone()) {
            info!(train = %train, "train authorized");
        }
        Ok(())
    }

    /// Reject future requests from `train`. A crossing already granted is
    /// not interrupted.
    pub fn deauthorize_train(&mut self, caller: &Identity, train: &Identity) -> Result<(), CrossingError> {
        self.ensure_operator(caller)?;
        if self.authorized_trains.remove(train) {
            info!(train = %train, "train deauthorized");
        }
        Ok(())
    }

    /// Manual safety reset: open the crossing and restart its validity window.
    ///
    /// This is the only way back into `FreeToCross`.
    pub fn update_free_to_cross_state(&mut self, caller: &Identity) -> Result<(), CrossingError> {
        self.ensure_operator(caller)?;
        let now = self.clock.now();
        self.commit(PhaseTransition {
            from: self.phase,
            to: Phase::FreeToCross,
            at: now,
            cause: TransitionCause::OperatorReset,
        });
        info!(at = %now, "crossing reset to free to cross");
        Ok(())
    }

    // ── car operations ───────────────────────────────────────────────────

    /// Ask for permission to cross. Re-requesting while already holding
    /// permission succeeds without taking another slot.
    pub fn request_car_permission(&mut self, car: &Identity) -> Result<(), CrossingError> {
        let now = self.clock.now();
        let pending = self.advance_if_expired(now);
        let observed = pending.as_ref().map_or(self.phase, |t| t.to);

        if !observed.admits_cars() {
            warn!(car = %car, phase = %observed, "car permission rejected");
            return Err(CrossingError::NotFreeToCross { observed });
        }

        if !self.cars_with_permission.contains(car)
            && self.cars_with_permission.len() >= self.config.max_cars
        {
            warn!(car = %car, max_cars = self.config.max_cars, "crossing full");
            return Err(CrossingError::CrossingFull {
                max_cars: self.config.max_cars,
            });
        }

        if let Some(transition) = pending {
            self.commit(transition);
        }
        self.cars_with_permission.insert(car.clone());
        debug!(car = %car, held = self.cars_with_permission.len(), "car permission granted");
        self.sink
            .emit(CrossingEvent::CarCrossingPermissionGranted(car.clone()));
        Ok(())
    }

    /// Give up crossing permission. Always succeeds, held or not.
    ///
    /// Emptying the crossing does not change the phase by itself; a
    /// pre-locked crossing locks on the next request.
    pub fn release_car_permission(&mut self, car: &Identity) {
        let now = self.clock.now();
        if let Some(transition) = self.advance_if_expired(now) {
            self.commit(transition);
        }

        if self.cars_with_permission.remove(car) {
            debug!(car = %car, held = self.cars_with_permission.len(), "car permission released");
        }
        self.sink
            .emit(CrossingEvent::CarCrossingPermissionReleased(car.clone()));
    }

    // ── train operations ─────────────────────────────────────────────────

    /// Ask to cross as a train.
    ///
    /// Returns [`TrainSignal::Stop`] and emits `StopTrain` when the crossing
    /// is pre-locked and the grace period has run out. Otherwise passage is
    /// granted.
    pub fn request_train_crossing(&mut self, train: &Identity) -> Result<TrainSignal, CrossingError> {
        if !self.authorized_trains.contains(train) {
            warn!(train = %train, "unauthorized train crossing request");
            return Err(CrossingError::NotAuthorizedTrain {
                caller: train.clone(),
            });
        }

        let now = self.clock.now();
        if let Some(transition) = self.advance_if_expired(now) {
            self.commit(transition);
        }

        if self.phase == Phase::PreLocked
            && now.has_expired(self.pre_locked_since, self.config.pre_locked_duration())
        {
            warn!(
                train = %train,
                cars = self.cars_with_permission.len(),
                pre_locked_since = %self.pre_locked_since,
                "grace period lapsed, stopping train"
            );
            self.sink.emit(CrossingEvent::StopTrain(train.clone()));
            return Ok(TrainSignal::Stop);
        }

        debug!(train = %train, phase = %self.phase, "train crossing granted");
        self.sink.emit(CrossingEvent::TrainCrossingRequest {
            train: train.clone(),
            granted: true,
        });
        Ok(TrainSignal::Proceed)
    }

    /// Report that a train has cleared. Does not reopen the crossing.
    pub fn release_train_crossing(&mut self, train: &Identity) {
        let now = self.clock.now();
        if let Some(transition) = self.advance_if_expired(now) {
            self.commit(transition);
        }

        debug!(train = %train, "train crossing released");
        self.sink
            .emit(CrossingEvent::TrainCrossingPermissionReleased(train.clone()));
    }

    // ── queries ──────────────────────────────────────────────────────────

    /// Phase as of the last call. Can lag behind the clock.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Phase the next car or train request would observe. Does not mutate.
    pub fn effective_phase(&self) -> Phase {
        self.advance_if_expired(self.clock.now())
            .map_or(self.phase, |t| t.to)
    }

    pub fn infrastructure_operator(&self) -> &Identity {
        &self.operator
    }

    pub fn is_authorized_train(&self, id: &Identity) -> bool {
        self.authorized_trains.contains(id)
    }

    pub fn has_car_permission(&self, id: &Identity) -> bool {
        self.cars_with_permission.contains(id)
    }

    /// Number of cars currently holding permission.
    pub fn cars_with_permission(&self) -> usize {
        self.cars_with_permission.len()
    }

    pub fn config(&self) -> &CrossingConfig {
        &self.config
    }

    pub fn free_to_cross_since(&self) -> Timestamp {
        self.free_to_cross_since
    }

    pub fn pre_locked_since(&self) -> Timestamp {
        self.pre_locked_since
    }

    pub fn history(&self) -> &PhaseHistory {
        &self.history
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn sink(&self) -> &E {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut E {
        &mut self.sink
    }

    // ── lazy timers ──────────────────────────────────────────────────────

    /// Work out the phase change elapsed time calls for, without applying it.
    ///
    /// An expired free-to-cross window locks the crossing. A pre-locked
    /// crossing whose cars have all left is re-evaluated and locks too.
    fn advance_if_expired(&self, now: Timestamp) -> Option<PhaseTransition> {
        match self.phase {
            Phase::FreeToCross
                if now.has_expired(self.free_to_cross_since, self.config.free_to_cross_duration()) =>
            {
                Some(self.lock_crossing(now, TransitionCause::FreeToCrossExpired))
            }
            Phase::PreLocked if self.cars_with_permission.is_empty() => {
                Some(self.lock_crossing(now, TransitionCause::CarsCleared))
            }
            _ => None,
        }
    }

    /// Leave the current phase towards `Locked`, through `PreLocked` if any
    /// car still holds permission.
    fn lock_crossing(&self, now: Timestamp, cause: TransitionCause) -> PhaseTransition {
        let to = if self.cars_with_permission.is_empty() {
            Phase::Locked
        } else {
            Phase::PreLocked
        };
        PhaseTransition {
            from: self.phase,
            to,
            at: now,
            cause,
        }
    }

    fn commit(&mut self, transition: PhaseTransition) {
        match transition.to {
            Phase::FreeToCross => self.free_to_cross_since = transition.at,
            Phase::PreLocked => self.pre_locked_since = transition.at,
            Phase::Locked => {}
        }
        debug!(
            from = %transition.from,
            to = %transition.to,
            at = %transition.at,
            cause = ?transition.cause,
            "phase transition"
        );
        self.phase = transition.to;
        self.history.record(transition);
    }

    fn ensure_operator(&self, caller: &Identity) -> Result<(), CrossingError> {
        if *caller == self.operator {
            Ok(())
        } else {
            warn!(caller = %caller, "operator-only call rejected");
            Err(CrossingError::NotOperator {
                caller: caller.clone(),
            })
        }
    }
}
