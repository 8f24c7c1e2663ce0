//! # Detached execution.
//!
//! A detached run has no synchronous caller, so every failure that would be
//! rethrown in attached mode is reported to the ambient handler instead.
//! The [`Scheduler`] trait is the seam to whatever executes the run; the crate
//! ships [`TokioScheduler`].

use std::future::Future;
use std::pin::Pin;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::channel::Subscription;
use crate::producer::RunOutcome;

/// Boxed detached run.
pub type BoxRunFuture = Pin<Box<dyn Future<Output = RunOutcome> + Send + 'static>>;

/// Executes detached runs.
pub trait Scheduler: Send + Sync + 'static {
    /// Starts `run` and returns a handle to its outcome.
    fn schedule(&self, run: BoxRunFuture) -> JoinHandle<RunOutcome>;
}

/// Spawns runs on a tokio runtime.
///
/// Without an explicit handle, runs are spawned on the runtime current at
/// `schedule` time (which must exist).
#[derive(Debug, Clone, Default)]
pub struct TokioScheduler {
    handle: Option<Handle>,
}

impl TokioScheduler {
    /// Scheduler using the current runtime.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scheduler bound to a specific runtime.
    #[must_use]
    pub fn with_handle(handle: Handle) -> Self {
        Self {
            handle: Some(handle),
        }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, run: BoxRunFuture) -> JoinHandle<RunOutcome> {
        match &self.handle {
            Some(handle) => handle.spawn(run),
            None => tokio::spawn(run),
        }
    }
}

/// Handle to a detached run.
#[derive(Debug)]
pub struct ProducerHandle {
    subscription: Subscription,
    join: JoinHandle<RunOutcome>,
}

impl ProducerHandle {
    pub(crate) fn new(subscription: Subscription, join: JoinHandle<RunOutcome>) -> Self {
        Self { subscription, join }
    }

    /// Disposes the subscription; the producer observes it at its next suspension point.
    pub fn cancel(&self) {
        self.subscription.dispose();
    }

    /// The run's subscription.
    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }

    /// Returns `true` once the run has finished.
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Waits for the run to finish.
    ///
    /// A run aborted by its runtime (e.g. shutdown) counts as cancelled.
    pub async fn join(self) -> RunOutcome {
        match self.join.await {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!(
                    subscription = self.subscription.id(),
                    "detached run did not finish: {err}"
                );
                RunOutcome::Cancelled
            }
        }
    }
}
