//! The crossing controller and its collaborators.
//!
//! This module is the imperative shell around the pure `core` types: it
//! reads the clock, mutates the permission sets and publishes events.
//!
//! # Key Concepts
//!
//! - **Controller**: owns all crossing state and gates every request
//! - **Clock**: injected source of crossing time, read once per request
//! - **Event sink**: injected destination for events observers care about
//! - **Lazy timers**: elapsed time is only noticed when the next request arrives

mod clock;
mod error;
mod events;
mod machine;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::CrossingError;
pub use events::{CrossingEvent, EventLog, EventSink, TracingSink};
pub use machine::{CrossingController, TrainSignal};
