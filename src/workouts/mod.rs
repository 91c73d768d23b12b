//! Workout session core: state, controller, and clock.

pub mod clock;
pub mod controller;
pub mod subscription;
pub mod types;

pub use clock::{apply_tick, HeartRateJitter, RandomJitter, ScriptedJitter};
pub use controller::{apply_increment, SessionController};
pub use subscription::StateSubscription;
pub use types::{
    ActivityStatus, SessionConfig, SessionError, WorkoutAction, WorkoutState,
    RESTING_HEART_RATE,
};
