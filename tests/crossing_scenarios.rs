//! End-to-end crossing scenarios with a 600s window, 5 cars and a 300s
//! grace period.

use crossing::builder::ControllerBuilder;
use crossing::controller::{
    CrossingController, CrossingError, CrossingEvent, EventLog, ManualClock, TrainSignal,
};
use crossing::core::{Identity, Phase, TransitionCause};
use std::time::Duration;

fn operator() -> Identity {
    Identity::from("operator")
}

fn deploy() -> (CrossingController<ManualClock, EventLog>, ManualClock) {
    let clock = ManualClock::starting_at(1_700_000_000);
    let crossing = ControllerBuilder::new()
        .operator(operator())
        .free_to_cross(Duration::from_secs(600))
        .max_cars(5)
        .pre_locked(Duration::from_secs(300))
        .clock(clock.clone())
        .build()
        .unwrap();
    (crossing, clock)
}

#[test]
fn deployer_is_the_operator() {
    let (crossing, _) = deploy();
    assert_eq!(crossing.infrastructure_operator(), &operator());
    assert_eq!(crossing.phase(), Phase::Locked);
}

#[test]
fn sixth_car_finds_the_crossing_full() {
    let (mut crossing, _) = deploy();
    crossing.update_free_to_cross_state(&operator()).unwrap();

    for i in 0..5 {
        crossing
            .request_car_permission(&Identity::new(format!("car-{i}")))
            .unwrap();
    }

    assert_eq!(
        crossing.request_car_permission(&Identity::from("car-5")),
        Err(CrossingError::CrossingFull { max_cars: 5 })
    );
    assert_eq!(crossing.cars_with_permission(), 5);
}

#[test]
fn released_slot_can_be_reused() {
    let (mut crossing, _) = deploy();
    crossing.update_free_to_cross_state(&operator()).unwrap();
    for i in 0..5 {
        crossing
            .request_car_permission(&Identity::new(format!("car-{i}")))
            .unwrap();
    }

    crossing.release_car_permission(&Identity::from("car-2"));

    assert_eq!(crossing.request_car_permission(&Identity::from("car-5")), Ok(()));
}

#[test]
fn deauthorized_train_is_turned_away() {
    let (mut crossing, _) = deploy();
    let train = Identity::from("train-a");
    crossing.authorize_train(&operator(), &train).unwrap();

    assert_eq!(crossing.request_train_crossing(&train), Ok(TrainSignal::Proceed));
    assert_eq!(
        crossing.sink().last(),
        Some(&CrossingEvent::TrainCrossingRequest {
            train: train.clone(),
            granted: true
        })
    );

    crossing.deauthorize_train(&operator(), &train).unwrap();
    assert_eq!(
        crossing.request_train_crossing(&train),
        Err(CrossingError::NotAuthorizedTrain { caller: train })
    );
}

#[test]
fn expired_window_with_no_cars_rejects_new_cars() {
    let (mut crossing, clock) = deploy();
    crossing.update_free_to_cross_state(&operator()).unwrap();
    clock.advance(Duration::from_secs(601));

    assert_eq!(
        crossing.request_car_permission(&Identity::from("car-x")),
        Err(CrossingError::NotFreeToCross {
            observed: Phase::Locked
        })
    );
}

#[test]
fn expired_window_with_no_cars_locks_on_train_request() {
    let (mut crossing, clock) = deploy();
    let train = Identity::from("train-a");
    crossing.authorize_train(&operator(), &train).unwrap();
    crossing.update_free_to_cross_state(&operator()).unwrap();
    clock.advance(Duration::from_secs(601));

    assert_eq!(crossing.request_train_crossing(&train), Ok(TrainSignal::Proceed));
    assert_eq!(crossing.phase(), Phase::Locked);
}

#[test]
fn lingering_car_stops_the_train_after_grace_period() {
    let (mut crossing, clock) = deploy();
    let train = Identity::from("train-a");
    let car = Identity::from("car-b");
    crossing.authorize_train(&operator(), &train).unwrap();
    crossing.update_free_to_cross_state(&operator()).unwrap();
    crossing.request_car_permission(&car).unwrap();

    clock.advance(Duration::from_secs(601));
    assert_eq!(crossing.request_train_crossing(&train), Ok(TrainSignal::Proceed));
    assert_eq!(crossing.phase(), Phase::PreLocked);

    clock.advance(Duration::from_secs(301));
    assert_eq!(crossing.request_train_crossing(&train), Ok(TrainSignal::Stop));
    assert_eq!(
        crossing.sink().last(),
        Some(&CrossingEvent::StopTrain(train.clone()))
    );

    // Once the car leaves, the next request finds the crossing locked.
    crossing.release_car_permission(&car);
    assert_eq!(crossing.request_train_crossing(&train), Ok(TrainSignal::Proceed));
    assert_eq!(crossing.phase(), Phase::Locked);
    assert_eq!(
        crossing.history().get_path(),
        vec![Phase::Locked, Phase::FreeToCross, Phase::PreLocked, Phase::Locked]
    );
    assert_eq!(
        crossing.history().last().map(|t| t.cause),
        Some(TransitionCause::CarsCleared)
    );
}

#[test]
fn operator_reset_reopens_a_pre_locked_crossing() {
    let (mut crossing, clock) = deploy();
    let car = Identity::from("car-b");
    crossing.update_free_to_cross_state(&operator()).unwrap();
    crossing.request_car_permission(&car).unwrap();
    clock.advance(Duration::from_secs(601));
    crossing.release_train_crossing(&Identity::from("train-a"));
    assert_eq!(crossing.phase(), Phase::PreLocked);

    crossing.update_free_to_cross_state(&operator()).unwrap();

    assert_eq!(crossing.phase(), Phase::FreeToCross);
    assert!(crossing.has_car_permission(&car));
    assert_eq!(crossing.request_car_permission(&Identity::from("car-c")), Ok(()));
}

#[test]
fn event_stream_matches_request_order() {
    let (mut crossing, _) = deploy();
    let car = Identity::from("car-1");
    let train = Identity::from("train-1");
    crossing.authorize_train(&operator(), &train).unwrap();
    crossing.update_free_to_cross_state(&operator()).unwrap();

    crossing.request_car_permission(&car).unwrap();
    crossing.release_car_permission(&car);
    crossing.request_train_crossing(&train).unwrap();
    crossing.release_train_crossing(&train);

    let names: Vec<&str> = crossing.sink().events().iter().map(CrossingEvent::name).collect();
    assert_eq!(
        names,
        vec![
            "CarCrossingPermissionGranted",
            "CarCrossingPermissionReleased",
            "TrainCrossingRequest",
            "TrainCrossingPermissionReleased",
        ]
    );
}
