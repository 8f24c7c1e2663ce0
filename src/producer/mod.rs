//! # Producer side: producers, their context, the runner and scheduling.
//!
//! - [`Producer`]: async, cancellable producer of values (trait).
//! - [`ProducerFn`]: closure-backed producer; [`ProducerRef`] is `Arc<dyn Producer<T>>`.
//! - [`ProducerContext`]: what a running body sees: `send`, cancellation, `suspend_until`.
//! - `ProducerRunner`: drives one body for one subscription and routes its outcome.
//! - [`Scheduler`] / [`TokioScheduler`] / [`ProducerHandle`]: detached execution.

mod context;
#[allow(clippy::module_inception)]
mod producer;
mod runner;
mod scheduler;

pub use context::ProducerContext;
pub use producer::{Producer, ProducerFn, ProducerRef};
pub(crate) use runner::ProducerRunner;
pub use runner::RunOutcome;
pub use scheduler::{BoxRunFuture, ProducerHandle, Scheduler, TokioScheduler};
