//! Ambient wall tile view.
//!
//! The tile maps rep progress onto three light phases and keeps its matrix
//! display hidden while the session is idle.

use crate::workouts::types::{ActivityStatus, WorkoutState};
use serde::{Deserialize, Serialize};

/// Edge color shown while the tile is dark.
const IDLE_EDGE_COLOR: GlowColor = GlowColor::new(0x33, 0x33, 0x33);

/// Edge stroke width while idle.
const IDLE_EDGE_WIDTH: u8 = 2;

/// Edge stroke width while lit.
const LIT_EDGE_WIDTH: u8 = 8;

/// RGB color of the tile's edge light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlowColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl GlowColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Hex string, e.g. `#10b981`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Progress band of the edge light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LightPhase {
    /// Below 33% (red)
    Phase1,
    /// 33% to below 66% (amber)
    Phase2,
    /// 66% and above (emerald)
    Phase3,
}

impl LightPhase {
    /// Phase for a progress percentage.
    pub fn from_progress(percent: f64) -> Self {
        if percent < 33.0 {
            LightPhase::Phase1
        } else if percent < 66.0 {
            LightPhase::Phase2
        } else {
            LightPhase::Phase3
        }
    }

    /// Edge light color for this phase.
    pub fn color(&self) -> GlowColor {
        match self {
            LightPhase::Phase1 => GlowColor::new(0xef, 0x44, 0x44),
            LightPhase::Phase2 => GlowColor::new(0xea, 0xb3, 0x08),
            LightPhase::Phase3 => GlowColor::new(0x10, 0xb9, 0x81),
        }
    }

    /// Opacity of the halo around the edge light.
    pub fn glow_alpha(&self) -> f32 {
        match self {
            LightPhase::Phase1 | LightPhase::Phase2 => 0.6,
            LightPhase::Phase3 => 0.8,
        }
    }
}

impl std::fmt::Display for LightPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LightPhase::Phase1 => write!(f, "Phase 1"),
            LightPhase::Phase2 => write!(f, "Phase 2"),
            LightPhase::Phase3 => write!(f, "Phase 3"),
        }
    }
}

/// Everything the tile needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct TileView {
    pub target: u32,
    pub count: u32,
    /// Progress toward the goal, 0-100
    pub progress_percent: f64,
    pub phase: LightPhase,
    pub edge_color: GlowColor,
    pub edge_width: u8,
    /// Opacity of the halo around the edge; 0 while dark
    pub glow_alpha: f32,
    /// Matrix display visibility; dark while idle
    pub visible: bool,
    pub goal_reached: bool,
    /// Scale of the translucent progress fill
    pub fill_scale: f64,
}

impl TileView {
    pub fn from_state(state: &WorkoutState) -> Self {
        let progress_percent = state.progress_percent();
        let phase = LightPhase::from_progress(progress_percent);
        let visible = state.status != ActivityStatus::Idle;

        Self {
            target: state.target,
            count: state.count,
            progress_percent,
            phase,
            edge_color: if visible { phase.color() } else { IDLE_EDGE_COLOR },
            edge_width: if visible { LIT_EDGE_WIDTH } else { IDLE_EDGE_WIDTH },
            glow_alpha: if visible { phase.glow_alpha() } else { 0.0 },
            visible,
            goal_reached: state.is_goal_reached(),
            fill_scale: 0.8 + progress_percent / 500.0,
        }
    }
}

impl std::fmt::Display for TileView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.visible {
            return write!(f, "[tile] dark");
        }
        write!(
            f,
            "[tile] {}/{} ({:.0}%) {} {}",
            self.count,
            self.target,
            self.progress_percent,
            self.phase,
            self.edge_color.to_hex()
        )?;
        if self.goal_reached {
            write!(f, " GOAL REACHED")?;
        }
        Ok(())
    }
}
