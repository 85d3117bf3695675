//! Crossing: a level-crossing safety controller.
//!
//! The controller mediates access to a road/rail crossing between authorized
//! trains and a bounded pool of cars. Cars are only granted passage while the
//! crossing is declared free to cross. A train is told to stop if cars have
//! not cleared within a grace period.
//!
//! The design keeps a pure core and an imperative shell: phase logic and
//! deadline arithmetic live in [`core`], while [`controller`] reads the clock,
//! owns the permission sets and publishes events.
//!
//! # Core Concepts
//!
//! - **Phase**: `FreeToCross`, `Locked` or `PreLocked`
//! - **Lazy timers**: expiry is noticed by the next request, never by a
//!   background scheduler
//! - **Access control**: one infrastructure operator and a set of authorized trains
//! - **Capacity**: at most `max_cars` cars hold permission at once
//!
//! # Example
//!
//! ```rust
//! use crossing::builder::ControllerBuilder;
//! use crossing::controller::{CrossingError, ManualClock};
//! use crossing::core::{Identity, Phase};
//! use std::time::Duration;
//!
//! let operator = Identity::from("operator");
//! let clock = ManualClock::new();
//! let mut crossing = ControllerBuilder::new()
//!     .operator(operator.clone())
//!     .free_to_cross(Duration::from_secs(600))
//!     .max_cars(5)
//!     .pre_locked(Duration::from_secs(300))
//!     .clock(clock.clone())
//!     .build()
//!     .unwrap();
//!
//! crossing.update_free_to_cross_state(&operator).unwrap();
//! assert_eq!(crossing.phase(), Phase::FreeToCross);
//!
//! clock.advance(Duration::from_secs(601));
//! assert_eq!(
//!     crossing.request_car_permission(&Identity::from("car")),
//!     Err(CrossingError::NotFreeToCross { observed: Phase::Locked })
//! );
//! ```

pub mod builder;
pub mod checkpoint;
pub mod config;
pub mod controller;
pub mod core;

// Re-export commonly used types
pub use builder::{BuildError, ControllerBuilder};
pub use config::CrossingConfig;
pub use controller::{
    Clock, CrossingController, CrossingError, CrossingEvent, EventSink, TrainSignal,
};
pub use self::core::{Identity, Phase, Timestamp};
