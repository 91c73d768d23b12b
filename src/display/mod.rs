//! Headless views for the wearable panel and the ambient tile.

pub mod tile;
pub mod watch;

pub use tile::{GlowColor, LightPhase, TileView};
pub use watch::{format_duration, Control, MotionTrace, WatchPanel, WatchView};
