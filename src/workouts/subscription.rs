//! State change subscriptions.

use crate::workouts::types::WorkoutState;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

/// Receives a snapshot after every session mutation.
///
/// Dropping the subscription (or calling [`StateSubscription::unsubscribe`])
/// detaches it from the session.
pub struct StateSubscription {
    receiver: broadcast::Receiver<WorkoutState>,
}

impl StateSubscription {
    pub(crate) fn new(receiver: broadcast::Receiver<WorkoutState>) -> Self {
        Self { receiver }
    }

    /// Wait for the next snapshot.
    ///
    /// Returns `None` once the session has been dropped. A subscriber that
    /// falls behind skips the overwritten snapshots.
    pub async fn recv(&mut self) -> Option<WorkoutState> {
        loop {
            match self.receiver.recv().await {
                Ok(state) => return Some(state),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "State subscriber lagged behind");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Take the next snapshot if one is already queued.
    pub fn try_recv(&mut self) -> Option<WorkoutState> {
        loop {
            match self.receiver.try_recv() {
                Ok(state) => return Some(state),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "State subscriber lagged behind");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }

    /// Take every queued snapshot.
    pub fn drain(&mut self) -> Vec<WorkoutState> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }

    /// Detach from the session.
    pub fn unsubscribe(self) {
        drop(self);
    }
}
