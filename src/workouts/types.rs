//! Workout session types and constants.
//!
//! Defines the shared `WorkoutState` record, the session lifecycle status,
//! the configuration consumed at construction, and the session error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Resting heart rate applied whenever the session goes idle.
pub const RESTING_HEART_RATE: f64 = 72.0;

/// Lower bound for passive heart-rate drift.
pub const MIN_ACTIVE_HEART_RATE: f64 = 80.0;

/// Upper bound for passive heart-rate drift.
pub const MAX_ACTIVE_HEART_RATE: f64 = 160.0;

/// Ceiling for the heart-rate spike applied on each rep.
pub const MAX_SPIKE_HEART_RATE: f64 = 170.0;

/// Heart-rate increase applied on each rep.
pub const REP_HEART_RATE_SPIKE: f64 = 2.0;

/// Maximum magnitude of the per-tick heart-rate jitter.
pub const JITTER_AMPLITUDE: f64 = 2.0;

/// Default goal rep count.
pub const DEFAULT_TARGET: u32 = 15;

/// Default calories burned per rep.
pub const DEFAULT_CALORIES_PER_REP: f64 = 0.5;

/// Default clock period in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;

/// Lifecycle status of a workout session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityStatus {
    /// No session running
    #[default]
    Idle,
    /// Session running, clock ticking
    Active,
    /// Session paused, clock stopped
    Paused,
    /// Goal badge; never entered by the controller
    Completed,
}

impl std::fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityStatus::Idle => write!(f, "IDLE"),
            ActivityStatus::Active => write!(f, "ACTIVE"),
            ActivityStatus::Paused => write!(f, "PAUSED"),
            ActivityStatus::Completed => write!(f, "COMPLETED"),
        }
    }
}

/// Snapshot of one in-progress or idle session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutState {
    /// Completed repetitions
    pub count: u32,
    /// Goal rep count
    pub target: u32,
    /// Estimated energy burned (kcal)
    pub calories: f64,
    /// Elapsed active time in seconds
    pub duration: u64,
    /// Simulated heart rate in bpm
    pub heart_rate: f64,
    /// Session lifecycle status
    pub status: ActivityStatus,
}

impl WorkoutState {
    /// Create the initial state for a session with the given target.
    pub fn new(target: u32) -> Self {
        Self {
            count: 0,
            target,
            calories: 0.0,
            duration: 0,
            heart_rate: RESTING_HEART_RATE,
            status: ActivityStatus::Idle,
        }
    }

    /// Whether the rep goal has been reached.
    pub fn is_goal_reached(&self) -> bool {
        self.count >= self.target
    }

    /// Progress toward the goal as a percentage, capped at 100.
    pub fn progress_percent(&self) -> f64 {
        if self.target == 0 {
            return 100.0;
        }
        (self.count as f64 / self.target as f64 * 100.0).min(100.0)
    }

    /// Whether the clock should be ticking for this state.
    pub fn is_active(&self) -> bool {
        self.status == ActivityStatus::Active
    }
}

impl Default for WorkoutState {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET)
    }
}

/// Named operations a presentation surface can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkoutAction {
    Start,
    Pause,
    Reset,
    Increment,
}

impl std::fmt::Display for WorkoutAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkoutAction::Start => write!(f, "START"),
            WorkoutAction::Pause => write!(f, "PAUSE"),
            WorkoutAction::Reset => write!(f, "RESET"),
            WorkoutAction::Increment => write!(f, "INCREMENT"),
        }
    }
}

/// Session configuration consumed at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Goal rep count (must be > 0)
    pub target: u32,
    /// Calories added per rep
    pub calories_per_rep: f64,
    /// Clock period in milliseconds
    pub tick_interval_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET,
            calories_per_rep: DEFAULT_CALORIES_PER_REP,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
        }
    }
}

impl SessionConfig {
    /// Check that the configuration describes a usable session.
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.target == 0 {
            return Err(SessionError::InvalidConfig(
                "target must be greater than zero".to_string(),
            ));
        }
        if !self.calories_per_rep.is_finite() || self.calories_per_rep < 0.0 {
            return Err(SessionError::InvalidConfig(format!(
                "calories_per_rep must be a non-negative number, got {}",
                self.calories_per_rep
            )));
        }
        if self.tick_interval_ms == 0 {
            return Err(SessionError::InvalidConfig(
                "tick_interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Clock period as a `Duration`.
    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_interval_ms)
    }
}

/// Errors raised while building a session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No tokio runtime available to drive the session clock")]
    NoRuntime,

    #[error("Invalid session configuration: {0}")]
    InvalidConfig(String),
}
