//! Checkpoint and restore for crossing controllers.
//!
//! A checkpoint captures the controller's own fields so a host can restart
//! without losing the phase, timers or permission sets. Clock and event
//! sink are not part of it; they are supplied again on restore.
//!
//! # Example
//!
//! ```rust
//! use crossing::checkpoint::Checkpoint;
//! use crossing::config::CrossingConfig;
//! use crossing::controller::{CrossingController, EventLog, ManualClock};
//! use crossing::core::{Identity, Phase};
//!
//! let operator = Identity::from("operator");
//! let clock = ManualClock::new();
//! let mut crossing =
//!     CrossingController::new(operator.clone(), CrossingConfig::default(), clock.clone(), EventLog::new())
//!         .unwrap();
//! crossing.update_free_to_cross_state(&operator).unwrap();
//!
//! let json = crossing.checkpoint().to_json().unwrap();
//! let restored =
//!     CrossingController::restore(Checkpoint::from_json(&json).unwrap(), clock, EventLog::new()).unwrap();
//! assert_eq!(restored.phase(), Phase::FreeToCross);
//! ```

use crate::config::CrossingConfig;
use crate::controller::{Clock, CrossingController, EventSink};
use crate::core::{Identity, Phase, PhaseHistory, Timestamp};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::info;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable snapshot of a controller's state.
///
/// Sets are stored sorted so equal controllers produce equal checkpoints.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: String,

    /// Wall-clock time the checkpoint was taken
    pub taken_at: DateTime<Utc>,

    pub operator: Identity,
    pub config: CrossingConfig,
    pub phase: Phase,
    pub free_to_cross_since: Timestamp,
    pub pre_locked_since: Timestamp,
    pub authorized_trains: BTreeSet<Identity>,
    pub cars_with_permission: BTreeSet<Identity>,
    pub history: PhaseHistory,
}

impl Checkpoint {
    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CheckpointError::Encode(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        serde_json::from_str(json).map_err(|e| CheckpointError::Decode(e.to_string()))
    }

    /// Compact binary encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::Encode(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CheckpointError> {
        bincode::deserialize(bytes)
            .map_err(|e| CheckpointError::Decode(e.to_string()))
    }

    /// Check the checkpoint describes a controller that could exist.
    pub fn validate(&self) -> Result<(), CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }

        let violations = self.config.violations();
        if !violations.is_empty() {
            let reasons: Vec<String> = violations.iter().map(ToString::to_string).collect();
            return Err(CheckpointError::Inconsistent(reasons.join("; ")));
        }

        if self.cars_with_permission.len() > self.config.max_cars {
            return Err(CheckpointError::Inconsistent(format!(
                "{} cars hold permission but capacity is {}",
                self.cars_with_permission.len(),
                self.config.max_cars
            )));
        }

        // Locked means nobody holds permission; holders keep the crossing PreLocked.
        if self.phase == Phase::Locked && !self.cars_with_permission.is_empty() {
            return Err(CheckpointError::Inconsistent(format!(
                "locked crossing with {} cars holding permission",
                self.cars_with_permission.len()
            )));
        }

        // PreLocked is only ever entered after the validity window ran out.
        if self.phase == Phase::PreLocked
            && !self
                .pre_locked_since
                .has_expired(self.free_to_cross_since, self.config.free_to_cross_duration())
        {
            return Err(CheckpointError::Inconsistent(format!(
                "grace period start {} precedes end of validity window opened at {}",
                self.pre_locked_since, self.free_to_cross_since
            )));
        }

        Ok(())
    }
}

impl<C: Clock, E: EventSink> CrossingController<C, E> {
    /// Snapshot the controller's own state.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            version: CHECKPOINT_VERSION,
            id: uuid::Uuid::new_v4().to_string(),
            taken_at: Utc::now(),
            operator: self.operator.clone(),
            config: self.config.clone(),
            phase: self.phase,
            free_to_cross_since: self.free_to_cross_since,
            pre_locked_since: self.pre_locked_since,
            authorized_trains: self.authorized_trains.iter().cloned().collect(),
            cars_with_permission: self.cars_with_permission.iter().cloned().collect(),
            history: self.history.clone(),
        }
    }

    /// Rebuild a controller from a validated checkpoint.
    pub fn restore(checkpoint: Checkpoint, clock: C, sink: E) -> Result<Self, CheckpointError> {
        checkpoint.validate()?;

        let now = clock.now();
        let latest = checkpoint.free_to_cross_since.max(checkpoint.pre_locked_since);
        if latest > now {
            return Err(CheckpointError::Inconsistent(format!(
                "timer started at {latest}, after the current time {now}"
            )));
        }

        let mut controller = Self::new(checkpoint.operator, checkpoint.config, clock, sink)
            .map_err(|e| CheckpointError::Inconsistent(e.to_string()))?;
        controller.phase = checkpoint.phase;
        controller.free_to_cross_since = checkpoint.free_to_cross_since;
        controller.pre_locked_since = checkpoint.pre_locked_since;
        controller.authorized_trains = checkpoint.authorized_trains.into_iter().collect();
        controller.cars_with_permission = checkpoint.cars_with_permission.into_iter().collect();
        controller.history = checkpoint.history.rebound(controller.config.history_limit);

        info!(
            checkpoint = %checkpoint.id,
            phase = %controller.phase,
            cars = controller.cars_with_permission.len(),
            "crossing controller restored"
        );
        Ok(controller)
    }
}
