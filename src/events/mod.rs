//! Routing events: types and broadcast bus.
//!
//! Every routing decision the bridge takes is published as an [`Event`] on a
//! [`Bus`]. Events are observational: the fate of a failure is decided before
//! the event is published and does not depend on anyone listening.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: the producer runner (terminal outcomes), the consumer
//!   invoker (callback failures), the uncaught reporter path.
//! - **Consumers**: anything holding a receiver from [`Bus::subscribe`]
//!   (tests, `LogWriter` with the `logging` feature, metrics exporters).

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
