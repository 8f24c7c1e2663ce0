//! Consumer-facing subscription handle.

use std::sync::Arc;

use crate::channel::{ChannelState, Gate};

/// Live binding between one producer and one subscriber.
///
/// Cloneable; every clone controls the same binding. Disposing is idempotent and
/// safe to call from inside any subscriber callback.
#[derive(Debug, Clone)]
pub struct Subscription {
    gate: Arc<Gate>,
}

impl Subscription {
    pub(crate) fn new(gate: Arc<Gate>) -> Self {
        Self { gate }
    }

    /// Detaches the subscriber: closes the channel and cancels the producer.
    pub fn dispose(&self) {
        if self.gate.close() {
            tracing::debug!(subscription = self.gate.id(), "subscription disposed");
        }
    }

    /// Returns `true` once the channel is closed (by disposal or termination).
    pub fn is_disposed(&self) -> bool {
        !self.gate.is_open()
    }

    /// Current channel state.
    pub fn state(&self) -> ChannelState {
        self.gate.state()
    }

    /// Subscription id.
    pub fn id(&self) -> u64 {
        self.gate.id()
    }
}
