//! Built-in ambient handlers.
//!
//! - [`LogHandler`]: logs through `tracing` (the default).
//! - [`CapturingHandler`]: records envelopes for later inspection (tests).

use std::sync::{Mutex, PoisonError};

use crate::classify::ErrorKind;
use crate::report::{AmbientExceptionHandler, HandlerContext, Undeliverable};

/// Logs undeliverable failures at `error` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogHandler;

impl AmbientExceptionHandler for LogHandler {
    fn handle(&self, ctx: &HandlerContext, error: Undeliverable) {
        match error.kind() {
            ErrorKind::Fatal => tracing::error!(
                producer = %ctx.producer,
                subscription = ctx.subscription,
                origin = %ctx.origin,
                "fatal undeliverable failure: {}",
                error.cause()
            ),
            ErrorKind::Ordinary => tracing::error!(
                producer = %ctx.producer,
                subscription = ctx.subscription,
                origin = %ctx.origin,
                "undeliverable failure: {}",
                error.cause()
            ),
        }
    }
}

/// Records every envelope it receives.
///
/// ## Example
/// ```
/// use std::sync::Arc;
/// use rxbridge::{Bridge, BridgeConfig, CapturingHandler};
///
/// let capture = Arc::new(CapturingHandler::new());
/// let bridge = Bridge::builder(BridgeConfig::default())
///     .with_handler(capture.clone())
///     .build();
/// assert!(capture.is_empty());
/// # drop(bridge);
/// ```
#[derive(Debug, Default)]
pub struct CapturingHandler {
    captured: Mutex<Vec<(HandlerContext, Undeliverable)>>,
}

impl CapturingHandler {
    /// Creates an empty handler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of envelopes recorded so far.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Removes and returns everything recorded so far.
    pub fn take(&self) -> Vec<(HandlerContext, Undeliverable)> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(HandlerContext, Undeliverable)>> {
        self.captured.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AmbientExceptionHandler for CapturingHandler {
    fn handle(&self, ctx: &HandlerContext, error: Undeliverable) {
        self.lock().push((ctx.clone(), error));
    }
}
