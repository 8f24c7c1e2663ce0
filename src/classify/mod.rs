//! # Failure classification.
//!
//! This module partitions every caught [`Failure`](crate::Failure) into
//! [`ErrorKind::Fatal`] or [`ErrorKind::Ordinary`] and records where it came from.
//!
//! - [`Classifier`]: pure, total mapping from [`ErrorCategory`](crate::ErrorCategory)
//!   to [`ErrorKind`], driven by a configured fatal set.
//! - [`ClassifiedError`]: immutable `{cause, kind, origin}` triple consumed by routing.
//! - [`ErrorClass`]: the four-way taxonomy (origin × kind) used in events and logs.

mod classified;
mod classifier;

pub use classified::{Callback, ClassifiedError, ErrorClass, Origin};
pub use classifier::{Classifier, DEFAULT_FATAL, ErrorKind};
