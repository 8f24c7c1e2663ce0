//! # Run one producer for one subscription.
//!
//! [`ProducerRunner`] attaches the subscriber, drives the producer body to its
//! terminal outcome and assigns every failure exactly one fate.
//!
//! ## Outcome routing
//!
//! ```text
//! attach:  on_subscribe fails ─────────────────────────────► surface(err)
//!
//! body → Ok(())                 → try_deliver_completion
//!                                    ├─ Delivered     → Completed
//!                                    ├─ Undeliverable → Cancelled (already closed)
//!                                    └─ Err(cb)       → surface(cb)
//! body → Err(Failed(f)) / panic → classify(f, ProducerBody)
//!          ├─ Ordinary → try_deliver_error(f)
//!          │                ├─ Delivered     → ErrorDelivered
//!          │                ├─ Undeliverable → report(f) → Reported
//!          │                └─ Err(cb)       → (f delivered) surface(cb)
//!          └─ Fatal    → close channel → surface(f)
//! body → Err(Send(Consumer(e))) → surface(e)       (keeps consumer origin)
//! body → Err(Send(Closed)) / Err(Cancelled) → Cancelled (silent)
//!
//! surface(e):  Attached → Err(BridgeError) to the caller
//!              Detached → report(e) → Reported
//! ```
//!
//! ## Rules
//! - `on_error` is never called with a fatal failure or with a consumer failure.
//! - Cancellation is not an error; only a failure raised by cleanup after
//!   cancellation is routed (and, the channel being closed, reported).
//! - Panics in the body are caught and routed as `ErrorCategory::Panic` failures.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;

use crate::channel::{DeliveryChannel, Subscription, Terminal};
use crate::classify::{ClassifiedError, ErrorKind, Origin};
use crate::core::RouteScope;
use crate::error::{BridgeError, Failure, ProducerError, SendError};
use crate::events::EventKind;
use crate::producer::{ProducerContext, ProducerRef};

/// Terminal outcome of a run that did not rethrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The producer finished and `on_complete` was delivered.
    Completed,
    /// The producer failed and `on_error` received the failure.
    ErrorDelivered,
    /// The run ended without a terminal event (disposed or cancelled).
    Cancelled,
    /// A failure was reported to the ambient handler as undeliverable.
    Reported,
}

impl RunOutcome {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            RunOutcome::Completed => "completed",
            RunOutcome::ErrorDelivered => "error_delivered",
            RunOutcome::Cancelled => "cancelled",
            RunOutcome::Reported => "reported",
        }
    }
}

/// Drives one producer body against one delivery channel.
pub(crate) struct ProducerRunner<T> {
    producer: ProducerRef<T>,
    channel: Arc<DeliveryChannel<T>>,
    scope: Arc<RouteScope>,
}

impl<T: Send + 'static> ProducerRunner<T> {
    pub(crate) fn new(
        producer: ProducerRef<T>,
        channel: Arc<DeliveryChannel<T>>,
        scope: Arc<RouteScope>,
    ) -> Self {
        Self {
            producer,
            channel,
            scope,
        }
    }

    pub(crate) fn subscription(&self) -> Subscription {
        self.channel.subscription()
    }

    /// Runs with a synchronous caller: failures to surface are returned as `Err`.
    pub(crate) async fn run_attached(self) -> Result<RunOutcome, BridgeError> {
        let err = match self.execute().await {
            Ok(outcome) => return Ok(outcome),
            Err(err) => err,
        };
        let rethrown = self.scope.event(EventKind::Rethrown).with_error(&err);
        let class = err.class();
        match BridgeError::rethrown(err.clone()) {
            Some(bridge_err) => {
                tracing::error!(
                    producer = %self.scope.producer,
                    subscription = self.scope.subscription,
                    class = class.as_label(),
                    "rethrowing to caller: {}",
                    err.cause()
                );
                self.scope.publish(rethrown);
                Err(bridge_err)
            }
            None => {
                self.scope.report(err);
                Ok(RunOutcome::Reported)
            }
        }
    }

    /// Runs without a synchronous caller: failures to surface are reported.
    pub(crate) async fn run_detached(self) -> RunOutcome {
        match self.execute().await {
            Ok(outcome) => outcome,
            Err(err) => {
                self.scope.report(err);
                RunOutcome::Reported
            }
        }
    }

    /// `Err` means "surface to the caller, if there is one".
    async fn execute(&self) -> Result<RunOutcome, ClassifiedError> {
        self.channel.attach()?;
        self.scope.publish(self.scope.event(EventKind::Subscribed));

        let ctx = ProducerContext::new(self.channel.clone());
        let res = AssertUnwindSafe(self.producer.produce(ctx))
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| Err(ProducerError::Failed(Failure::from_panic(payload))));

        match res {
            Ok(()) => self.complete(),
            Err(ProducerError::Failed(failure)) => self.fail(failure),
            Err(ProducerError::Send(SendError::Consumer(err))) => Err(err),
            Err(ProducerError::Send(SendError::Closed)) | Err(ProducerError::Cancelled) => {
                Ok(self.cancelled())
            }
        }
    }

    fn complete(&self) -> Result<RunOutcome, ClassifiedError> {
        match self.channel.try_deliver_completion()? {
            Terminal::Delivered => {
                self.scope.publish(self.scope.event(EventKind::Completed));
                Ok(RunOutcome::Completed)
            }
            Terminal::Undeliverable => Ok(self.cancelled()),
        }
    }

    fn fail(&self, failure: Failure) -> Result<RunOutcome, ClassifiedError> {
        let err = self.scope.classify(failure, Origin::ProducerBody);

        match err.kind() {
            ErrorKind::Ordinary => {
                let delivered = self.channel.try_deliver_error(err.cause().clone());
                if !matches!(delivered, Ok(Terminal::Undeliverable)) {
                    tracing::debug!(
                        producer = %self.scope.producer,
                        subscription = self.scope.subscription,
                        "producer failure delivered to on_error: {}",
                        err.cause()
                    );
                    self.scope
                        .publish(self.scope.event(EventKind::ErrorDelivered).with_error(&err));
                }
                match delivered? {
                    Terminal::Delivered => Ok(RunOutcome::ErrorDelivered),
                    Terminal::Undeliverable => {
                        self.scope.report(err);
                        Ok(RunOutcome::Reported)
                    }
                }
            }
            ErrorKind::Fatal => {
                self.channel.close();
                Err(err)
            }
        }
    }

    fn cancelled(&self) -> RunOutcome {
        self.channel.close();
        tracing::debug!(
            producer = %self.scope.producer,
            subscription = self.scope.subscription,
            "producer stopped without terminal event"
        );
        self.scope.publish(self.scope.event(EventKind::Cancelled));
        RunOutcome::Cancelled
    }
}

/// A run dropped before reaching a terminal outcome (caller gave up on the
/// attached future, or the runtime aborted a detached task) still closes the
/// channel, which cancels the producer token and disposes the subscription.
impl<T> Drop for ProducerRunner<T> {
    fn drop(&mut self) {
        if self.channel.close() {
            tracing::debug!(
                producer = %self.scope.producer,
                subscription = self.scope.subscription,
                "run dropped before terminal outcome; subscription closed"
            );
        }
    }
}
