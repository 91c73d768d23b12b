//! GlowSync - Simulated Wearable and Ambient Tile Workout Tracker
//!
//! A virtual wearable controller and a virtual ambient-light wall tile mirror
//! one shared workout session. The session core tracks reps, calories,
//! duration, and a simulated heart rate, driven by a cancellable one-second
//! clock while the session is active.

pub mod display;
pub mod storage;
pub mod workouts;

// Re-export commonly used types
pub use display::{TileView, WatchPanel, WatchView};
pub use storage::config::AppConfig;
pub use workouts::controller::SessionController;
pub use workouts::types::{ActivityStatus, SessionConfig, WorkoutAction, WorkoutState};
