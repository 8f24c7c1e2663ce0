//! # Uncaught reporter and the ambient handler trait.
//!
//! [`UncaughtReporter`] is the sink of last resort. It forwards each
//! [`Undeliverable`] to an injected [`AmbientExceptionHandler`] and never fails:
//! a panicking handler is caught and logged.
//!
//! Any `Fn(&HandlerContext, Undeliverable)` closure is a handler.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use crate::classify::Origin;
use crate::error::Failure;
use crate::report::{LogHandler, Undeliverable};

/// Where an undeliverable failure was reported from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerContext {
    /// Name of the producer.
    pub producer: Arc<str>,
    /// Subscription id.
    pub subscription: u64,
    /// Failure domain.
    pub origin: Origin,
}

/// Installable handler receiving undeliverable failures.
///
/// ### Implementation requirements
/// - Do not block for long; it runs inline on the routing path.
/// - Do not panic; a panic is caught, logged and otherwise ignored.
pub trait AmbientExceptionHandler: Send + Sync + 'static {
    /// Handles one undeliverable failure.
    fn handle(&self, ctx: &HandlerContext, error: Undeliverable);
}

impl<F> AmbientExceptionHandler for F
where
    F: Fn(&HandlerContext, Undeliverable) + Send + Sync + 'static,
{
    fn handle(&self, ctx: &HandlerContext, error: Undeliverable) {
        self(ctx, error)
    }
}

/// Sink for failures no subscriber or caller can receive.
#[derive(Clone)]
pub struct UncaughtReporter {
    handler: Arc<dyn AmbientExceptionHandler>,
}

impl UncaughtReporter {
    /// Creates a reporter forwarding to `handler`.
    pub fn new(handler: Arc<dyn AmbientExceptionHandler>) -> Self {
        Self { handler }
    }

    /// Forwards `error` to the handler.
    ///
    /// Returns the handler's panic as a [`Failure`] if it panicked; the failure
    /// has already been logged by then.
    pub fn report(&self, ctx: &HandlerContext, error: Undeliverable) -> Option<Failure> {
        let cause = error.cause().clone();
        match catch_unwind(AssertUnwindSafe(|| self.handler.handle(ctx, error))) {
            Ok(()) => None,
            Err(payload) => {
                let panic = Failure::from_panic(payload);
                tracing::error!(
                    producer = %ctx.producer,
                    subscription = ctx.subscription,
                    origin = %ctx.origin,
                    cause = %cause,
                    panic = %panic.message(),
                    "ambient exception handler panicked; undeliverable failure logged instead"
                );
                Some(panic)
            }
        }
    }
}

impl Default for UncaughtReporter {
    /// Reports through [`LogHandler`].
    fn default() -> Self {
        Self::new(Arc::new(LogHandler))
    }
}

impl std::fmt::Debug for UncaughtReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UncaughtReporter").finish_non_exhaustive()
    }
}
