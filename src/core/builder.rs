use std::sync::Arc;

use crate::{
    classify::Classifier,
    core::{Bridge, BridgeConfig},
    events::Bus,
    producer::{Scheduler, TokioScheduler},
    report::{AmbientExceptionHandler, LogHandler, UncaughtReporter},
};

/// Builder for constructing a [`Bridge`] with optional collaborators.
pub struct BridgeBuilder {
    cfg: BridgeConfig,
    handler: Option<Arc<dyn AmbientExceptionHandler>>,
    classifier: Option<Classifier>,
    scheduler: Option<Arc<dyn Scheduler>>,
}

impl BridgeBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: BridgeConfig) -> Self {
        Self {
            cfg,
            handler: None,
            classifier: None,
            scheduler: None,
        }
    }

    /// Installs the ambient handler receiving undeliverable failures.
    ///
    /// Default: [`LogHandler`].
    pub fn with_handler(mut self, handler: Arc<dyn AmbientExceptionHandler>) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Replaces the classifier derived from the config.
    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Sets the scheduler used by detached subscriptions.
    ///
    /// Default: [`TokioScheduler`] on the current runtime.
    pub fn with_scheduler(mut self, scheduler: Arc<dyn Scheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// Builds the bridge.
    pub fn build(self) -> Bridge {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let classifier = self.classifier.unwrap_or_else(|| self.cfg.classifier());
        let handler = self.handler.unwrap_or_else(|| Arc::new(LogHandler));
        let scheduler = self
            .scheduler
            .unwrap_or_else(|| Arc::new(TokioScheduler::new()));

        Bridge::new_internal(
            self.cfg,
            bus,
            Arc::new(classifier),
            UncaughtReporter::new(handler),
            scheduler,
        )
    }
}
