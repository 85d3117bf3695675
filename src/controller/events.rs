//! Events the controller publishes for trains, gate control and monitoring.

use crate::core::Identity;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// A notable outcome of a request, carrying the acting identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossingEvent {
    CarCrossingPermissionGranted(Identity),
    CarCrossingPermissionReleased(Identity),
    TrainCrossingRequest { train: Identity, granted: bool },
    TrainCrossingPermissionReleased(Identity),
    /// The grace period lapsed with cars possibly still on the crossing.
    StopTrain(Identity),
}

impl CrossingEvent {
    /// Event name as external observers know it.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CarCrossingPermissionGranted(_) => "CarCrossingPermissionGranted",
            Self::CarCrossingPermissionReleased(_) => "CarCrossingPermissionReleased",
            Self::TrainCrossingRequest { .. } => "TrainCrossingRequest",
            Self::TrainCrossingPermissionReleased(_) => "TrainCrossingPermissionReleased",
            Self::StopTrain(_) => "StopTrain",
        }
    }

    /// The identity that triggered the event.
    pub fn actor(&self) -> &Identity {
        match self {
            Self::CarCrossingPermissionGranted(id)
            | Self::CarCrossingPermissionReleased(id)
            | Self::TrainCrossingPermissionReleased(id)
            | Self::StopTrain(id) => id,
            Self::TrainCrossingRequest { train, .. } => train,
        }
    }
}

/// Destination for crossing events.
pub trait EventSink {
    fn emit(&mut self, event: CrossingEvent);
}

impl EventSink for Vec<CrossingEvent> {
    fn emit(&mut self, event: CrossingEvent) {
        self.push(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: CrossingEvent) {
        (**self).emit(event);
    }
}

/// In-memory event recorder.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Vec<CrossingEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[CrossingEvent] {
        &self.events
    }

    pub fn last(&self) -> Option<&CrossingEvent> {
        self.events.last()
    }

    /// Take every recorded event, leaving the log empty.
    pub fn drain(&mut self) -> Vec<CrossingEvent> {
        std::mem::take(&mut self.events)
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, event: CrossingEvent) {
        self.events.push(event);
    }
}

/// Writes each event as a structured `tracing` record.
///
/// `StopTrain` is logged at warn level, everything else at info.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&mut self, event: CrossingEvent) {
        match &event {
            CrossingEvent::StopTrain(train) => {
                warn!(event = event.name(), train = %train, "crossing event");
            }
            CrossingEvent::TrainCrossingRequest { train, granted } => {
                info!(event = event.name(), train = %train, granted, "crossing event");
            }
            other => {
                info!(event = other.name(), actor = %other.actor(), "crossing event");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actor_is_the_acting_identity() {
        let train = Identity::from("train-1");
        let event = CrossingEvent::TrainCrossingRequest {
            train: train.clone(),
            granted: true,
        };
        assert_eq!(event.actor(), &train);
        assert_eq!(event.name(), "TrainCrossingRequest");
    }

    #[test]
    fn event_log_drains() {
        let mut log = EventLog::new();
        log.emit(CrossingEvent::StopTrain(Identity::from("train-1")));

        assert_eq!(log.events().len(), 1);
        assert_eq!(log.drain().len(), 1);
        assert!(log.events().is_empty());
    }

    #[test]
    fn vec_is_a_sink() {
        let mut events: Vec<CrossingEvent> = Vec::new();
        events.emit(CrossingEvent::CarCrossingPermissionReleased(Identity::from("car")));
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn tracing_sink_accepts_every_event() {
        let id = Identity::from("x");
        let mut sink = TracingSink;
        sink.emit(CrossingEvent::CarCrossingPermissionGranted(id.clone()));
        sink.emit(CrossingEvent::TrainCrossingRequest {
            train: id.clone(),
            granted: true,
        });
        sink.emit(CrossingEvent::StopTrain(id));
    }

    #[test]
    fn event_serializes_correctly() {
        let event = CrossingEvent::TrainCrossingRequest {
            train: Identity::from("train-9"),
            granted: true,
        };
        let json = serde_json::to_string(&event).unwrap();
        let deserialized: CrossingEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deserialized);
    }
}
