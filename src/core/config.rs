//! # Bridge configuration.
//!
//! Provides [`BridgeConfig`] centralized settings for a [`Bridge`](crate::Bridge).
//!
//! ## Sentinel values
//! - `bus_capacity = 0` → clamped to 1

use crate::classify::{Classifier, DEFAULT_FATAL};
use crate::error::ErrorCategory;

/// Configuration for a [`Bridge`](crate::Bridge).
///
/// ## Field semantics
/// - `bus_capacity`: Event bus ring buffer size (min 1; clamped by Bus)
/// - `fatal`: Categories classified as fatal
/// - `panic_is_fatal`: Treat caught panics as fatal instead of ordinary
///
/// ## Notes
/// A classifier passed to [`BridgeBuilder::with_classifier`](crate::BridgeBuilder::with_classifier)
/// replaces `fatal` and `panic_is_fatal`.
#[derive(Clone, Debug)]
pub struct BridgeConfig {
    /// Capacity of the event bus broadcast channel ring buffer.
    pub bus_capacity: usize,

    /// Failure categories treated as fatal.
    pub fatal: Vec<ErrorCategory>,

    /// Whether a panic caught in a producer body or a callback is fatal.
    ///
    /// Default `false`: a panic is treated like any ordinary failure.
    pub panic_is_fatal: bool,
}

impl BridgeConfig {
    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Builds the classifier described by this config.
    pub fn classifier(&self) -> Classifier {
        let classifier = Classifier::new(self.fatal.iter().copied());
        if self.panic_is_fatal {
            classifier.with_fatal(ErrorCategory::Panic)
        } else {
            classifier.without_fatal(ErrorCategory::Panic)
        }
    }
}

impl Default for BridgeConfig {
    /// Default configuration:
    ///
    /// - `bus_capacity = 1024`
    /// - `fatal = DEFAULT_FATAL` (out-of-memory, stack overflow, linkage, VM, invariant violation)
    /// - `panic_is_fatal = false`
    fn default() -> Self {
        Self {
            bus_capacity: 1024,
            fatal: DEFAULT_FATAL.to_vec(),
            panic_is_fatal: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ErrorKind;
    use crate::error::Failure;

    #[test]
    fn default_classifier_matches_default_fatal_set() {
        let c = BridgeConfig::default().classifier();
        assert_eq!(c.classify(&Failure::linkage("x")), ErrorKind::Fatal);
        assert_eq!(c.classify(&Failure::domain("x")), ErrorKind::Ordinary);
        assert!(!c.is_fatal(ErrorCategory::Panic));
    }

    #[test]
    fn panic_can_be_promoted_to_fatal() {
        let cfg = BridgeConfig {
            panic_is_fatal: true,
            ..BridgeConfig::default()
        };
        assert!(cfg.classifier().is_fatal(ErrorCategory::Panic));
    }

    #[test]
    fn zero_bus_capacity_is_clamped() {
        let cfg = BridgeConfig {
            bus_capacity: 0,
            ..BridgeConfig::default()
        };
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }
}
