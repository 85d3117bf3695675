//! A Shift at the Crossing
//!
//! This example deploys a crossing with the standard parameters (a 600s
//! validity window, 3 cars and a 60s grace period) and walks through one
//! shift on a manual clock.
//!
//! Key concepts:
//! - Operator-only reset into FreeToCross
//! - Capacity limit on car permissions
//! - Lazy expiry: the phase only moves when someone calls
//! - StopTrain when a car overstays the grace period
//!
//! Run with: RUST_LOG=debug cargo run --example crossing_shift

use crossing::builder::ControllerBuilder;
use crossing::config::CrossingConfig;
use crossing::controller::{ManualClock, TracingSink, TrainSignal};
use crossing::core::Identity;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    println!("=== Level Crossing Shift ===\n");

    let operator = Identity::from("infrastructure");
    let clock = ManualClock::starting_at(1_700_000_000);
    let mut crossing = ControllerBuilder::new()
        .operator(operator.clone())
        .config(CrossingConfig::default())
        .clock(clock.clone())
        .sink(TracingSink)
        .build()?;

    println!("Deployed by {}", crossing.infrastructure_operator());
    println!("Initial phase: {}\n", crossing.phase());

    let express = Identity::from("express-401");
    crossing.authorize_train(&operator, &express)?;
    crossing.update_free_to_cross_state(&operator)?;
    println!("Operator opened the crossing: {}", crossing.phase());

    for name in ["car-a", "car-b", "car-c", "car-d"] {
        match crossing.request_car_permission(&Identity::from(name)) {
            Ok(()) => println!("  {name}: granted"),
            Err(e) => println!("  {name}: rejected ({e})"),
        }
    }

    for name in ["car-a", "car-b"] {
        crossing.release_car_permission(&Identity::from(name));
    }
    println!("Two cars cleared, {} still crossing\n", crossing.cars_with_permission());

    clock.advance(Duration::from_secs(601));
    println!("601s later, stored phase: {}", crossing.phase());
    println!("Next request would observe: {}", crossing.effective_phase());

    let signal = crossing.request_train_crossing(&express)?;
    println!("{express} asks to cross: {signal:?} (phase now {})", crossing.phase());

    clock.advance(Duration::from_secs(61));
    let signal = crossing.request_train_crossing(&express)?;
    println!("61s later {express} asks again: {signal:?}");
    if signal == TrainSignal::Stop {
        println!("  car-c has overstayed the grace period, train must stop");
    }

    crossing.release_car_permission(&Identity::from("car-c"));
    let signal = crossing.request_train_crossing(&express)?;
    println!("car-c cleared, {express} asks again: {signal:?} (phase now {})", crossing.phase());
    crossing.release_train_crossing(&express);

    println!("\nPhase path: {:?}", crossing.history().get_path());
    println!("\nCheckpoint:\n{}", crossing.checkpoint().to_json()?);

    println!("\n=== Example Complete ===");
    Ok(())
}
