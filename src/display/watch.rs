//! Wearable controller panel.
//!
//! Models the watch face: the metrics it shows, the buttons it offers in
//! each status, and the simulated accelerometer trace. Motion gestures only
//! reach the controller while the session is active.

use crate::workouts::controller::SessionController;
use crate::workouts::types::{ActivityStatus, WorkoutAction, WorkoutState};
use rand::Rng;
use std::collections::VecDeque;

/// Samples kept in the accelerometer trace.
pub const TRACE_LEN: usize = 20;

/// Magnitude of idle accelerometer noise.
const NOISE_AMPLITUDE: f64 = 10.0;

/// Samples appended when a rep is detected.
const REP_SPIKE: [f64; 5] = [50.0, -40.0, 20.0, 0.0, 0.0];

/// Watch buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Start,
    Pause,
    Reset,
}

impl Control {
    /// Controller action triggered by this button.
    pub fn action(&self) -> WorkoutAction {
        match self {
            Control::Start => WorkoutAction::Start,
            Control::Pause => WorkoutAction::Pause,
            Control::Reset => WorkoutAction::Reset,
        }
    }
}

/// Format a duration in seconds to H:MM:SS or M:SS.
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Everything the watch face needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchView {
    pub status: ActivityStatus,
    pub count: u32,
    pub heart_rate_bpm: u32,
    pub calories: f64,
    pub elapsed: String,
    /// Buttons shown for the current status
    pub controls: Vec<Control>,
    /// Whether tapping the face registers a rep
    pub motion_enabled: bool,
}

impl WatchView {
    pub fn from_state(state: &WorkoutState) -> Self {
        let controls = match state.status {
            ActivityStatus::Idle | ActivityStatus::Paused => vec![Control::Start],
            ActivityStatus::Active | ActivityStatus::Completed => {
                vec![Control::Pause, Control::Reset]
            }
        };

        Self {
            status: state.status,
            count: state.count,
            heart_rate_bpm: state.heart_rate.round().max(0.0) as u32,
            calories: state.calories,
            elapsed: format_duration(state.duration),
            controls,
            motion_enabled: state.is_active(),
        }
    }
}

impl std::fmt::Display for WatchView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[watch] {} reps | {} bpm | {:.1} kcal | {} | {}",
            self.count, self.heart_rate_bpm, self.calories, self.elapsed, self.status
        )
    }
}

/// Rolling accelerometer trace shown behind the watch metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionTrace {
    samples: VecDeque<f64>,
}

impl MotionTrace {
    pub fn new() -> Self {
        Self {
            samples: std::iter::repeat(0.0).take(TRACE_LEN).collect(),
        }
    }

    /// Append one noise sample, dropping the oldest.
    pub fn push_noise<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.samples.pop_front();
        self.samples
            .push_back(rng.gen_range(-NOISE_AMPLITUDE..NOISE_AMPLITUDE));
    }

    /// Replace the oldest samples with a rep spike.
    pub fn spike(&mut self) {
        self.samples.drain(..REP_SPIKE.len());
        self.samples.extend(REP_SPIKE);
    }

    pub fn samples(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }

    /// Largest absolute sample in the trace.
    pub fn peak(&self) -> f64 {
        self.samples.iter().fold(0.0_f64, |peak, s| peak.max(s.abs()))
    }
}

impl Default for MotionTrace {
    fn default() -> Self {
        Self::new()
    }
}

/// Watch face bound to a session.
///
/// Routes button presses and motion gestures to the controller, only
/// offering what the watch face would show for the current status.
pub struct WatchPanel<'a> {
    controller: &'a SessionController,
    trace: MotionTrace,
}

impl<'a> WatchPanel<'a> {
    pub fn new(controller: &'a SessionController) -> Self {
        Self {
            controller,
            trace: MotionTrace::new(),
        }
    }

    /// Current view of the session.
    pub fn view(&self) -> WatchView {
        WatchView::from_state(&self.controller.snapshot())
    }

    /// Press a button. Buttons not shown for the current status do nothing.
    pub fn press(&mut self, control: Control) -> WorkoutState {
        if !self.view().controls.contains(&control) {
            tracing::debug!(?control, "Button not available");
            return self.controller.snapshot();
        }
        self.controller.dispatch(control.action())
    }

    /// Simulate a motion gesture. Returns whether a rep was registered.
    pub fn simulate_motion(&mut self) -> bool {
        if !self.view().motion_enabled {
            return false;
        }
        self.trace.spike();
        let before = self.controller.snapshot().count;
        self.controller.increment().count > before
    }

    /// Sample accelerometer noise. Ignored unless the session is active.
    pub fn sample_noise<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.view().motion_enabled {
            self.trace.push_noise(rng);
        }
    }

    pub fn trace(&self) -> &MotionTrace {
        &self.trace
    }
}
