//! Session controller.
//!
//! The controller is the single authority over the session status. It owns
//! the START / PAUSE / RESET / INCREMENT operations and starts or stops the
//! [`SessionClock`] whenever the status changes.
//!
//! All mutations, including clock ticks, go through one mutex so they are
//! applied one at a time. Each mutation publishes a snapshot to subscribers
//! while the lock is still held, so subscribers see mutations in order.

use crate::workouts::clock::{HeartRateJitter, RandomJitter, SessionClock};
use crate::workouts::subscription::StateSubscription;
use crate::workouts::types::{
    ActivityStatus, SessionConfig, SessionError, WorkoutAction, WorkoutState,
    MAX_SPIKE_HEART_RATE, REP_HEART_RATE_SPIKE, RESTING_HEART_RATE,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Snapshots retained for slow subscribers.
const UPDATE_CHANNEL_CAPACITY: usize = 64;

/// Lock a mutex, recovering the value if a previous holder panicked.
pub(crate) fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Shared session state guarded by the session lock.
pub(crate) struct SessionCore {
    pub(crate) state: WorkoutState,
    /// Bumped on every clock start and stop
    pub(crate) generation: u64,
    /// Live ticker task, if any
    pub(crate) ticker: Option<JoinHandle<()>>,
    updates: broadcast::Sender<WorkoutState>,
}

impl SessionCore {
    /// Initial core for a session with the given target.
    pub(crate) fn new(target: u32) -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            state: WorkoutState::new(target),
            generation: 0,
            ticker: None,
            updates,
        }
    }

    /// Send the current state to subscribers and return it.
    pub(crate) fn publish(&self) -> WorkoutState {
        let snapshot = self.state.clone();
        // No subscribers is fine
        let _ = self.updates.send(snapshot.clone());
        snapshot
    }
}

/// Apply one rep to a state.
pub fn apply_increment(state: &mut WorkoutState, calories_per_rep: f64) {
    state.count = state.count.saturating_add(1);
    state.calories += calories_per_rep;
    state.heart_rate = (state.heart_rate + REP_HEART_RATE_SPIKE).min(MAX_SPIKE_HEART_RATE);
}

/// Drives one workout session.
pub struct SessionController {
    config: SessionConfig,
    core: Arc<Mutex<SessionCore>>,
    clock: SessionClock,
}

impl SessionController {
    /// Create a controller on the current tokio runtime with random jitter.
    pub fn new(config: SessionConfig) -> Result<Self, SessionError> {
        Self::with_jitter(config, Box::new(RandomJitter::new()))
    }

    /// Create a controller on the current tokio runtime.
    pub fn with_jitter(
        config: SessionConfig,
        jitter: Box<dyn HeartRateJitter>,
    ) -> Result<Self, SessionError> {
        let runtime = Handle::try_current().map_err(|_| SessionError::NoRuntime)?;
        Self::with_runtime(config, jitter, runtime)
    }

    /// Create a controller whose clock runs on `runtime`.
    pub fn with_runtime(
        config: SessionConfig,
        jitter: Box<dyn HeartRateJitter>,
        runtime: Handle,
    ) -> Result<Self, SessionError> {
        config.validate()?;

        let core = SessionCore::new(config.target);
        let clock = SessionClock::new(config.tick_interval(), jitter, runtime);

        tracing::info!(
            goal = config.target,
            calories_per_rep = config.calories_per_rep,
            "Session created"
        );

        Ok(Self {
            config,
            core: Arc::new(Mutex::new(core)),
            clock,
        })
    }

    /// Session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Current state.
    pub fn snapshot(&self) -> WorkoutState {
        lock(&self.core).state.clone()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> StateSubscription {
        StateSubscription::new(lock(&self.core).updates.subscribe())
    }

    /// Whether the clock currently has a live ticker.
    pub fn is_clock_running(&self) -> bool {
        lock(&self.core)
            .ticker
            .as_ref()
            .is_some_and(|t| !t.is_finished())
    }

    /// Run a named action.
    pub fn dispatch(&self, action: WorkoutAction) -> WorkoutState {
        match action {
            WorkoutAction::Start => self.start(),
            WorkoutAction::Pause => self.pause(),
            WorkoutAction::Reset => self.reset(),
            WorkoutAction::Increment => self.increment(),
        }
    }

    /// Enter the active status and start the clock.
    pub fn start(&self) -> WorkoutState {
        let mut core = lock(&self.core);

        if core.state.is_active() {
            tracing::debug!("Session already active");
            return core.state.clone();
        }

        self.transition(&mut core, ActivityStatus::Active);
        core.publish()
    }

    /// Enter the paused status and stop the clock.
    pub fn pause(&self) -> WorkoutState {
        let mut core = lock(&self.core);

        if core.state.status == ActivityStatus::Paused {
            tracing::debug!("Session already paused");
            return core.state.clone();
        }

        self.transition(&mut core, ActivityStatus::Paused);
        core.publish()
    }

    /// Stop the clock and reinitialize the session.
    pub fn reset(&self) -> WorkoutState {
        let mut core = lock(&self.core);

        self.transition(&mut core, ActivityStatus::Idle);
        core.state = WorkoutState::new(self.config.target);

        tracing::info!("Session reset");
        core.publish()
    }

    /// Register one rep. Ignored unless the session is active.
    pub fn increment(&self) -> WorkoutState {
        let mut core = lock(&self.core);

        if !core.state.is_active() {
            tracing::debug!(status = %core.state.status, "Ignoring rep while session is not active");
            return core.state.clone();
        }

        apply_increment(&mut core.state, self.config.calories_per_rep);
        tracing::debug!(
            count = core.state.count,
            calories = core.state.calories,
            heart_rate = core.state.heart_rate,
            "Rep registered"
        );

        if core.state.count == core.state.target {
            tracing::info!(goal = core.state.target, "Goal reached");
        }

        core.publish()
    }

    /// Stop any live clock. Called on drop.
    pub fn shutdown(&self) {
        let mut core = lock(&self.core);
        if self.clock.stop(&mut core) {
            tracing::info!("Session clock stopped on shutdown");
        }
    }

    /// Move to `next`, toggling the clock to match.
    fn transition(&self, core: &mut SessionCore, next: ActivityStatus) {
        let previous = core.state.status;
        core.state.status = next;

        if next == ActivityStatus::Active {
            self.clock.start(core, &self.core);
        } else {
            self.clock.stop(core);
        }

        if next == ActivityStatus::Idle {
            core.state.heart_rate = RESTING_HEART_RATE;
        }

        if previous != next {
            tracing::info!(from = %previous, to = %next, "Session status changed");
        }
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.shutdown();
    }
}
