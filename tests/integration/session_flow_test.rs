//! Integration tests for a full session.
//!
//! Drives the controller through the documented workout scenario and checks
//! the snapshot stream subscribers receive along the way.

use glowsync::workouts::clock::{RandomJitter, ScriptedJitter};
use glowsync::workouts::controller::SessionController;
use glowsync::workouts::types::{ActivityStatus, SessionConfig, WorkoutAction, WorkoutState};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tokio::time::sleep;

#[tokio::test(start_paused = true)]
async fn test_full_workout_scenario() {
    let session = SessionController::with_jitter(
        SessionConfig::default(),
        Box::new(RandomJitter::seeded(99)),
    )
    .unwrap();
    let initial = session.snapshot();
    assert_eq!(initial.target, 15);

    session.start();
    sleep(Duration::from_millis(3500)).await;

    let state = session.snapshot();
    assert_eq!(state.duration, 3);
    assert!((80.0..=160.0).contains(&state.heart_rate));

    for _ in 0..15 {
        session.increment();
    }

    let state = session.snapshot();
    assert_eq!(state.count, 15);
    assert_eq!(state.calories, 7.5);
    assert!(state.is_goal_reached());
    // Reaching the goal is a badge, not a status
    assert_eq!(state.status, ActivityStatus::Active);

    session.reset();
    assert_eq!(session.snapshot(), initial);
}

#[tokio::test(start_paused = true)]
async fn test_subscriber_sees_every_mutation_in_order() {
    let session = SessionController::with_jitter(
        SessionConfig::default(),
        Box::new(ScriptedJitter::constant(1.0)),
    )
    .unwrap();
    let mut updates = session.subscribe();

    session.start();
    sleep(Duration::from_millis(2500)).await;
    session.increment();
    session.pause();

    let seen = updates.drain();
    let summary: Vec<(ActivityStatus, u64, u32)> = seen
        .iter()
        .map(|s| (s.status, s.duration, s.count))
        .collect();

    assert_eq!(
        summary,
        vec![
            (ActivityStatus::Active, 0, 0),
            (ActivityStatus::Active, 1, 0),
            (ActivityStatus::Active, 2, 0),
            (ActivityStatus::Active, 2, 1),
            (ActivityStatus::Paused, 2, 1),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_ignored_operations_publish_nothing() {
    let session = SessionController::with_jitter(
        SessionConfig::default(),
        Box::new(ScriptedJitter::constant(0.0)),
    )
    .unwrap();
    let mut updates = session.subscribe();

    session.increment();
    session.start();
    session.start();
    session.pause();
    session.pause();
    session.increment();

    let statuses: Vec<ActivityStatus> = updates.drain().iter().map(|s| s.status).collect();
    assert_eq!(statuses, vec![ActivityStatus::Active, ActivityStatus::Paused]);
}

#[tokio::test(start_paused = true)]
async fn test_counters_monotonic_until_reset() {
    let session = SessionController::with_jitter(
        SessionConfig::default(),
        Box::new(RandomJitter::seeded(5)),
    )
    .unwrap();
    let mut updates = session.subscribe();
    let mut rng = StdRng::seed_from_u64(17);
    let mut previous = session.snapshot();

    for _ in 0..200 {
        let action = match rng.gen_range(0..10) {
            0..=2 => WorkoutAction::Start,
            3 => WorkoutAction::Pause,
            4 => WorkoutAction::Reset,
            _ => WorkoutAction::Increment,
        };
        session.dispatch(action);
        sleep(Duration::from_millis(rng.gen_range(0..1500))).await;

        for state in updates.drain() {
            if state.status == ActivityStatus::Idle {
                assert_eq!(state.count, 0);
                assert_eq!(state.calories, 0.0);
                assert_eq!(state.duration, 0);
                assert_eq!(state.heart_rate, 72.0);
            } else {
                assert!(state.count >= previous.count);
                assert!(state.calories >= previous.calories);
                assert!(state.duration >= previous.duration);
                assert!(state.heart_rate <= 170.0);
            }

            if state.duration == previous.duration + 1 {
                assert_eq!(state.count, previous.count);
                assert!((80.0..=160.0).contains(&state.heart_rate));
            }
            previous = state;
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_lagging_subscriber_skips_ahead() {
    let session = SessionController::with_jitter(
        SessionConfig::default(),
        Box::new(ScriptedJitter::constant(0.0)),
    )
    .unwrap();
    let mut updates = session.subscribe();

    session.start();
    for _ in 0..99 {
        session.increment();
    }

    let seen = updates.drain();
    assert_eq!(seen.len(), 64);
    assert_eq!(seen.first().map(|s| s.count), Some(36));
    assert_eq!(seen.last().map(|s| s.count), Some(99));
}

#[tokio::test(start_paused = true)]
async fn test_unsubscribe_and_close() {
    let session = SessionController::with_jitter(
        SessionConfig::default(),
        Box::new(ScriptedJitter::constant(0.0)),
    )
    .unwrap();

    let early = session.subscribe();
    early.unsubscribe();

    let mut late = session.subscribe();
    drop(session);

    assert!(late.recv().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_dropping_controller_stops_clock() {
    let session = SessionController::with_jitter(
        SessionConfig::default(),
        Box::new(ScriptedJitter::constant(0.0)),
    )
    .unwrap();
    let mut updates = session.subscribe();

    session.start();
    sleep(Duration::from_millis(1500)).await;
    drop(session);

    let mut last = WorkoutState::default();
    while let Some(state) = updates.recv().await {
        last = state;
    }
    assert_eq!(last.duration, 1);
}

#[test]
fn test_clock_on_explicit_runtime() {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_time()
        .build()
        .unwrap();

    let config = SessionConfig {
        tick_interval_ms: 20,
        ..Default::default()
    };
    let session = SessionController::with_runtime(
        config,
        Box::new(ScriptedJitter::constant(0.0)),
        runtime.handle().clone(),
    )
    .unwrap();

    session.start();
    std::thread::sleep(Duration::from_millis(300));
    assert!(session.snapshot().duration >= 1);

    session.reset();
    std::thread::sleep(Duration::from_millis(100));
    assert_eq!(session.snapshot().duration, 0);
}
