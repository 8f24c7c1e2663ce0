//! Atomic open/closed gate.

use std::sync::atomic::{AtomicU8, Ordering};

use tokio_util::sync::CancellationToken;

const OPEN: u8 = 0;
const CLOSED: u8 = 1;

/// Observable state of a [`Gate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// Deliveries may happen.
    Open,
    /// Terminal; nothing is delivered any more.
    Closed,
}

/// Single source of truth for "may anything still be delivered?".
///
/// Closing the gate also cancels the producer's token, so the producer
/// observes it at its next suspension point.
#[derive(Debug)]
pub struct Gate {
    id: u64,
    state: AtomicU8,
    token: CancellationToken,
}

impl Gate {
    pub(crate) fn new(id: u64, token: CancellationToken) -> Self {
        Self {
            id,
            state: AtomicU8::new(OPEN),
            token,
        }
    }

    /// Subscription id this gate belongs to.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Current state.
    pub fn state(&self) -> ChannelState {
        match self.state.load(Ordering::Acquire) {
            OPEN => ChannelState::Open,
            _ => ChannelState::Closed,
        }
    }

    /// Returns `true` while the gate is open.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.state.load(Ordering::Acquire) == OPEN
    }

    /// Closes the gate and cancels the producer token.
    ///
    /// Returns `true` only for the caller that performed the transition.
    pub fn close(&self) -> bool {
        let won = self
            .state
            .compare_exchange(OPEN, CLOSED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if won {
            self.token.cancel();
        }
        won
    }

    /// Token cancelled when the gate closes.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}
