//! Scripted fingerprint collectors.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ena_activate::{ActivateError, ActivateResult, FingerprintCollector};

/// Collector that returns a fixed value and counts its invocations.
///
/// Clones share the counter, so tests can keep one clone and move the
/// other into the controller.
#[derive(Debug, Clone)]
pub struct CountingCollector {
    value: String,
    calls: Arc<AtomicUsize>,
}

impl CountingCollector {
    /// Create a collector returning `value`.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of times [`FingerprintCollector::collect`] has run.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FingerprintCollector for CountingCollector {
    fn collect(&self) -> ActivateResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.value.clone())
    }
}

/// Collector that always fails, counting its invocations.
#[derive(Debug, Clone, Default)]
pub struct FailingCollector {
    calls: Arc<AtomicUsize>,
}

impl FailingCollector {
    /// Create a failing collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times [`FingerprintCollector::collect`] has run.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FingerprintCollector for FailingCollector {
    fn collect(&self) -> ActivateResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ActivateError::Fingerprint(
            "scripted collector failure".into(),
        ))
    }
}
