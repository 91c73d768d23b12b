//! Unit tests for the SessionController state machine.

use glowsync::workouts::clock::{RandomJitter, ScriptedJitter};
use glowsync::workouts::controller::SessionController;
use glowsync::workouts::types::{ActivityStatus, SessionConfig, WorkoutState};
use std::time::Duration;
use tokio::time::sleep;

fn create_controller() -> SessionController {
    SessionController::with_jitter(
        SessionConfig::default(),
        Box::new(ScriptedJitter::new(vec![2.0, -1.0])),
    )
    .expect("Should create controller")
}

#[tokio::test(start_paused = true)]
async fn test_initial_state() {
    let session = create_controller();
    assert_eq!(session.snapshot(), WorkoutState::new(15));
    assert!(!session.is_clock_running());
}

#[tokio::test(start_paused = true)]
async fn test_start_from_paused() {
    let session = create_controller();

    session.start();
    session.pause();
    let state = session.start();

    assert_eq!(state.status, ActivityStatus::Active);
    assert!(session.is_clock_running());
}

#[tokio::test(start_paused = true)]
async fn test_pause_from_idle() {
    let session = create_controller();

    let state = session.pause();
    assert_eq!(state.status, ActivityStatus::Paused);
    assert!(!session.is_clock_running());

    // Second pause is a no-op
    assert_eq!(session.pause(), state);
}

#[tokio::test(start_paused = true)]
async fn test_increment_is_additive() {
    let session = create_controller();
    session.start();

    let before = session.snapshot();
    let after = session.increment();

    assert_eq!(after.count, before.count + 1);
    assert_eq!(after.calories, before.calories + 0.5);
    assert_eq!(after.heart_rate, before.heart_rate + 2.0);
    assert_eq!(after.duration, before.duration);
}

#[tokio::test(start_paused = true)]
async fn test_increment_spike_capped() {
    let session = create_controller();
    session.start();

    for _ in 0..100 {
        let state = session.increment();
        assert!(state.heart_rate <= 170.0);
    }
    assert_eq!(session.snapshot().heart_rate, 170.0);
}

#[tokio::test(start_paused = true)]
async fn test_double_start_runs_one_clock() {
    let session = create_controller();

    session.start();
    session.start();
    sleep(Duration::from_millis(5500)).await;
    session.start();
    sleep(Duration::from_millis(2000)).await;

    // Ticks at 1..=7 seconds
    assert_eq!(session.snapshot().duration, 7);
}

#[tokio::test(start_paused = true)]
async fn test_pause_immediately_after_start() {
    let session = create_controller();

    session.start();
    session.pause();
    sleep(Duration::from_secs(10)).await;

    assert_eq!(session.snapshot().duration, 0);
}

#[tokio::test(start_paused = true)]
async fn test_reset_immediately_after_start() {
    let session = create_controller();

    session.start();
    session.reset();
    sleep(Duration::from_secs(10)).await;

    assert_eq!(session.snapshot(), WorkoutState::new(15));
}

#[tokio::test(start_paused = true)]
async fn test_pause_freezes_duration() {
    let session = create_controller();

    session.start();
    sleep(Duration::from_millis(2500)).await;
    session.pause();
    sleep(Duration::from_secs(10)).await;
    assert_eq!(session.snapshot().duration, 2);

    // Resume: the first tick comes one full period after start
    session.start();
    sleep(Duration::from_millis(1500)).await;
    assert_eq!(session.snapshot().duration, 3);
}

#[tokio::test(start_paused = true)]
async fn test_reset_keeps_configured_target() {
    let config = SessionConfig {
        target: 20,
        calories_per_rep: 1.25,
        ..Default::default()
    };
    let session = SessionController::with_jitter(config, Box::new(RandomJitter::seeded(3)))
        .expect("Should create controller");

    session.start();
    sleep(Duration::from_millis(4200)).await;
    session.increment();
    session.increment();
    assert_eq!(session.snapshot().calories, 2.5);

    let state = session.reset();
    assert_eq!(
        state,
        WorkoutState {
            count: 0,
            target: 20,
            calories: 0.0,
            duration: 0,
            heart_rate: 72.0,
            status: ActivityStatus::Idle,
        }
    );
}

#[tokio::test(start_paused = true)]
async fn test_custom_tick_interval() {
    let config = SessionConfig {
        tick_interval_ms: 250,
        ..Default::default()
    };
    let session = SessionController::with_jitter(config, Box::new(ScriptedJitter::constant(0.0)))
        .expect("Should create controller");

    session.start();
    sleep(Duration::from_millis(1100)).await;

    assert_eq!(session.snapshot().duration, 4);
}
