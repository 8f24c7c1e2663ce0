//! # Delivery channel between producer and subscriber.
//!
//! - [`Gate`]: atomic `Open → Closed` state shared by both sides, bound to the
//!   producer's cancellation token.
//! - [`Subscription`]: consumer-facing handle over the gate (`dispose`).
//! - [`DeliveryChannel`]: the "can I still push?" abstraction used by the
//!   producer side; delivers through the [`ConsumerInvoker`](crate::consumer::ConsumerInvoker).
//!
//! ## Rules
//! - `Closed` is terminal; exactly one caller wins the transition.
//! - After the transition no `on_next`/`on_error`/`on_complete` starts.
//! - No lock is held while a subscriber callback runs.

mod delivery;
mod gate;
mod subscription;

pub use delivery::{Delivery, DeliveryChannel, Terminal};
pub use gate::{ChannelState, Gate};
pub use subscription::Subscription;
