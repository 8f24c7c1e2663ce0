//! # Ambient reporting of undeliverable failures.
//!
//! Failures that cannot reach the subscriber and have no synchronous caller to
//! return to end up here, wrapped in an [`Undeliverable`] envelope.
//!
//! ## Architecture
//! ```text
//! route ──► Undeliverable::new(classified) ──► UncaughtReporter::report(ctx, env)
//!                                                     │
//!                                    catch_unwind ────┼──► handler.handle(ctx, env)
//!                                                     │        (LogHandler / CapturingHandler / closure)
//!                                                     └──► on handler panic: tracing::error! fallback
//! ```
//!
//! The handler is injected per [`Bridge`](crate::Bridge); there is no hidden
//! process-wide global. Tests install a [`CapturingHandler`].

mod handlers;
mod reporter;
mod undeliverable;

pub use handlers::{CapturingHandler, LogHandler};
pub use reporter::{AmbientExceptionHandler, HandlerContext, UncaughtReporter};
pub use undeliverable::Undeliverable;
