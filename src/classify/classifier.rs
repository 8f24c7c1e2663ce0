//! # Fatal/ordinary classifier.
//!
//! A failure is **fatal** when it signals a runtime-integrity violation that a
//! program cannot meaningfully recover from (memory or stack exhaustion,
//! linkage failures, runtime/VM failures, broken invariants). Everything else is
//! **ordinary** and may be delivered through the stream's error channel.
//!
//! ## Rules
//! - Classification looks only at [`Failure::category`]; no type inspection.
//! - The fatal set is configuration: extend it with [`Classifier::with_fatal`].
//! - `classify` is total and side-effect-free.

use std::collections::HashSet;
use std::fmt;

use crate::classify::{ClassifiedError, Origin};
use crate::error::{ErrorCategory, Failure};

/// Categories treated as fatal by [`Classifier::default`].
pub const DEFAULT_FATAL: [ErrorCategory; 5] = [
    ErrorCategory::OutOfMemory,
    ErrorCategory::StackOverflow,
    ErrorCategory::Linkage,
    ErrorCategory::VirtualMachine,
    ErrorCategory::InvariantViolation,
];

/// Result of classifying a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Runtime-integrity failure; never treated as a normal stream failure.
    Fatal,
    /// Domain/application failure; eligible for `on_error` delivery.
    Ordinary,
}

impl ErrorKind {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ErrorKind::Fatal => "fatal",
            ErrorKind::Ordinary => "ordinary",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Maps failure categories to [`ErrorKind`].
///
/// # Example
/// ```
/// use rxbridge::{Classifier, ErrorCategory, ErrorKind, Failure};
///
/// let classifier = Classifier::default().with_fatal(ErrorCategory::Custom("corrupt_index"));
///
/// assert_eq!(classifier.classify(&Failure::domain("bad input")), ErrorKind::Ordinary);
/// assert_eq!(classifier.classify(&Failure::linkage("missing symbol")), ErrorKind::Fatal);
/// assert_eq!(
///     classifier.classify(&Failure::new(ErrorCategory::Custom("corrupt_index"), "checksum")),
///     ErrorKind::Fatal,
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Classifier {
    fatal: HashSet<ErrorCategory>,
}

impl Classifier {
    /// Creates a classifier with exactly the given fatal categories.
    pub fn new(fatal: impl IntoIterator<Item = ErrorCategory>) -> Self {
        Self {
            fatal: fatal.into_iter().collect(),
        }
    }

    /// Returns a classifier that also treats `category` as fatal.
    pub fn with_fatal(mut self, category: ErrorCategory) -> Self {
        self.fatal.insert(category);
        self
    }

    /// Returns a classifier that treats `category` as ordinary.
    pub fn without_fatal(mut self, category: ErrorCategory) -> Self {
        self.fatal.remove(&category);
        self
    }

    /// Classifies a failure.
    #[inline]
    pub fn classify(&self, failure: &Failure) -> ErrorKind {
        if self.fatal.contains(&failure.category()) {
            ErrorKind::Fatal
        } else {
            ErrorKind::Ordinary
        }
    }

    /// Classifies a failure and binds it to its origin.
    pub fn classified(&self, failure: Failure, origin: Origin) -> ClassifiedError {
        let kind = self.classify(&failure);
        ClassifiedError::new(failure, kind, origin)
    }

    /// Returns `true` if `category` is in the fatal set.
    pub fn is_fatal(&self, category: ErrorCategory) -> bool {
        self.fatal.contains(&category)
    }
}

impl Default for Classifier {
    /// Fatal set = [`DEFAULT_FATAL`]; panics are ordinary.
    fn default() -> Self {
        Self::new(DEFAULT_FATAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_fatal_set() {
        let c = Classifier::default();
        for cat in DEFAULT_FATAL {
            assert_eq!(c.classify(&Failure::new(cat, "x")), ErrorKind::Fatal, "{cat}");
        }
        for cat in [
            ErrorCategory::Domain,
            ErrorCategory::Io,
            ErrorCategory::Timeout,
            ErrorCategory::Panic,
            ErrorCategory::Custom("anything"),
        ] {
            assert_eq!(c.classify(&Failure::new(cat, "x")), ErrorKind::Ordinary, "{cat}");
        }
    }

    #[test]
    fn fatal_set_is_configurable() {
        let c = Classifier::default()
            .with_fatal(ErrorCategory::Panic)
            .without_fatal(ErrorCategory::Linkage);
        assert!(c.is_fatal(ErrorCategory::Panic));
        assert!(!c.is_fatal(ErrorCategory::Linkage));
        assert_eq!(c.classify(&Failure::linkage("x")), ErrorKind::Ordinary);
    }

    #[test]
    fn empty_classifier_is_all_ordinary() {
        let c = Classifier::new([]);
        assert_eq!(c.classify(&Failure::out_of_memory("x")), ErrorKind::Ordinary);
    }

    #[test]
    fn classified_keeps_cause_and_origin() {
        let f = Failure::out_of_memory("heap");
        let err = Classifier::default().classified(f.clone(), Origin::ProducerBody);
        assert!(err.cause().same_as(&f));
        assert_eq!(err.kind(), ErrorKind::Fatal);
        assert_eq!(err.origin(), Origin::ProducerBody);
    }
}
