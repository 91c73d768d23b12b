//! Session clock for passive time and heart-rate drift.
//!
//! The clock ticks only while the session is active. Each tick advances the
//! elapsed duration by one second and nudges the heart rate by a jitter
//! sample, clamped to the passive range.
//!
//! Cancellation is token based: every start and stop bumps the session's
//! generation counter under the session lock, and a ticker only mutates
//! state while its own token is still current.

use crate::workouts::controller::{lock, SessionCore};
use crate::workouts::types::{
    WorkoutState, JITTER_AMPLITUDE, MAX_ACTIVE_HEART_RATE, MIN_ACTIVE_HEART_RATE,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::time::{self, Instant};

/// Source of per-tick heart-rate perturbation.
pub trait HeartRateJitter: Send {
    /// Next delta to add to the heart rate, in bpm.
    fn next_delta(&mut self) -> f64;
}

/// Uniform jitter in `[-2, 2)` bpm.
pub struct RandomJitter {
    rng: StdRng,
}

impl RandomJitter {
    /// Create a jitter source seeded from the OS.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a reproducible jitter source.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomJitter {
    fn default() -> Self {
        Self::new()
    }
}

impl HeartRateJitter for RandomJitter {
    fn next_delta(&mut self) -> f64 {
        self.rng.gen_range(-JITTER_AMPLITUDE..JITTER_AMPLITUDE)
    }
}

/// Jitter that cycles through a fixed list of deltas.
///
/// Deltas are not limited to the random range, so tests can push the heart
/// rate straight into either clamp bound.
#[derive(Debug, Clone)]
pub struct ScriptedJitter {
    deltas: Vec<f64>,
    next: usize,
}

impl ScriptedJitter {
    pub fn new(deltas: Vec<f64>) -> Self {
        Self { deltas, next: 0 }
    }

    /// Always return the same delta.
    pub fn constant(delta: f64) -> Self {
        Self::new(vec![delta])
    }
}

impl HeartRateJitter for ScriptedJitter {
    fn next_delta(&mut self) -> f64 {
        if self.deltas.is_empty() {
            return 0.0;
        }
        let delta = self.deltas[self.next % self.deltas.len()];
        self.next = self.next.wrapping_add(1);
        delta
    }
}

/// Apply one passive tick to a state.
pub fn apply_tick(state: &mut WorkoutState, delta: f64) {
    state.duration = state.duration.saturating_add(1);
    state.heart_rate =
        (state.heart_rate + delta).clamp(MIN_ACTIVE_HEART_RATE, MAX_ACTIVE_HEART_RATE);
}

/// Periodic ticker bound to one session.
pub(crate) struct SessionClock {
    period: Duration,
    jitter: Arc<Mutex<Box<dyn HeartRateJitter>>>,
    runtime: Handle,
}

impl SessionClock {
    /// Create a clock that spawns its ticker on `runtime`.
    pub(crate) fn new(
        period: Duration,
        jitter: Box<dyn HeartRateJitter>,
        runtime: Handle,
    ) -> Self {
        Self {
            period,
            jitter: Arc::new(Mutex::new(jitter)),
            runtime,
        }
    }

    /// Start ticking. Returns `false` if a ticker is already live.
    ///
    /// Must be called with the session lock held; `core` is the guarded
    /// value of `session`.
    pub(crate) fn start(&self, core: &mut SessionCore, session: &Arc<Mutex<SessionCore>>) -> bool {
        if core.ticker.as_ref().is_some_and(|t| !t.is_finished()) {
            tracing::debug!("Session clock already running");
            return false;
        }

        core.generation = core.generation.wrapping_add(1);
        let token = core.generation;
        let session = Arc::downgrade(session);
        let jitter = Arc::clone(&self.jitter);
        let period = self.period;

        let task = self.runtime.spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                if !Self::tick(&session, &jitter, token) {
                    break;
                }
            }
        });

        core.ticker = Some(task);
        tracing::debug!(generation = token, "Session clock started");
        true
    }

    /// Stop ticking. Returns `false` if no ticker was live.
    ///
    /// Must be called with the session lock held. Any tick that is already
    /// waiting on the lock will see a stale token and exit.
    pub(crate) fn stop(&self, core: &mut SessionCore) -> bool {
        core.generation = core.generation.wrapping_add(1);
        match core.ticker.take() {
            Some(task) => {
                task.abort();
                tracing::debug!(generation = core.generation, "Session clock stopped");
                true
            }
            None => false,
        }
    }

    /// Apply one tick if `token` is still current. Returns whether the
    /// ticker should keep running.
    fn tick(
        session: &Weak<Mutex<SessionCore>>,
        jitter: &Mutex<Box<dyn HeartRateJitter>>,
        token: u64,
    ) -> bool {
        let Some(session) = session.upgrade() else {
            return false;
        };
        let mut core = lock(&session);

        if core.generation != token || !core.state.is_active() {
            tracing::debug!(token, current = core.generation, "Dropping stale clock tick");
            return false;
        }

        let delta = lock(jitter).next_delta();
        apply_tick(&mut core.state, delta);
        tracing::debug!(
            duration = core.state.duration,
            heart_rate = core.state.heart_rate,
            "Session tick"
        );
        core.publish();
        true
    }
}
