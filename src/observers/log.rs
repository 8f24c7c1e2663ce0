//! # LogWriter: routing event printer
//!
//! A minimal listener that writes incoming [`Event`]s through `tracing`.
//! Use it for tests or demos.
//!
//! ## Example output
//! ```text
//! [subscribed] producer="prices" sub=3
//! [error-delivered] producer="prices" sub=3 class=ordinary_producer err="domain: feed closed"
//! [undeliverable] producer="prices" sub=4 class=ordinary_producer err="domain: late"
//! [rethrown] producer="prices" sub=5 class=fatal_producer err="linkage: missing symbol"
//! [cancelled] producer="prices" sub=6
//! ```

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::events::{Bus, Event, EventKind};

/// Event writer.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Spawns a task that writes every event published on `bus` until the bus is dropped.
    pub fn spawn(self, bus: &Bus) -> JoinHandle<()> {
        let mut rx = bus.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => self.write(&ev),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "[log-writer-lagged]");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }

    /// Writes one event.
    pub fn write(&self, e: &Event) {
        let producer = e.producer.as_deref().unwrap_or("unknown");
        let class = e.class.map(|c| c.as_label()).unwrap_or("none");
        let reason = e.reason.as_deref().unwrap_or("");

        match e.kind {
            EventKind::Subscribed => {
                tracing::info!("[subscribed] producer={producer:?} sub={:?}", e.subscription);
            }
            EventKind::Completed => {
                tracing::info!("[completed] producer={producer:?} sub={:?}", e.subscription);
            }
            EventKind::Cancelled => {
                tracing::info!("[cancelled] producer={producer:?} sub={:?}", e.subscription);
            }
            EventKind::ErrorDelivered => {
                tracing::info!(
                    "[error-delivered] producer={producer:?} sub={:?} class={class} err={reason:?}",
                    e.subscription
                );
            }
            EventKind::UndeliverableReported => {
                tracing::warn!(
                    "[undeliverable] producer={producer:?} sub={:?} class={class} err={reason:?}",
                    e.subscription
                );
            }
            EventKind::Rethrown => {
                tracing::error!(
                    "[rethrown] producer={producer:?} sub={:?} class={class} err={reason:?}",
                    e.subscription
                );
            }
            EventKind::CallbackFailed => {
                tracing::warn!(
                    "[callback-failed] producer={producer:?} sub={:?} class={class} err={reason:?}",
                    e.subscription
                );
            }
            EventKind::HandlerPanicked => {
                tracing::error!(
                    "[handler-panicked] producer={producer:?} sub={:?} failure={:?} info={reason}",
                    e.subscription,
                    e.failure
                );
            }
        }
    }
}
