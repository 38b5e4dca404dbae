//! Device identity (fingerprint) collection seam.
//!
//! The activation controller depends on a collector producing a stable
//! identity value but does not define how it is computed. The stock
//! implementations cover the common deployments (serial-number file,
//! operator-supplied literal); anything else plugs in through the trait.

use std::path::PathBuf;

use crate::error::{ActivateError, ActivateResult};

/// Source of the device identity proof included in each activation request.
///
/// Collection runs once per attempt; implementations must not cache across
/// attempts on behalf of the controller, since device state can change
/// between ticks.
pub trait FingerprintCollector: Send + Sync {
    /// Collect the current fingerprint value.
    ///
    /// # Errors
    ///
    /// Returns [`ActivateError::Fingerprint`] if the identity source is
    /// unavailable; the controller aborts the attempt without sending a
    /// request.
    fn collect(&self) -> ActivateResult<String>;
}

/// Collector reading a serial number from a file on the device.
#[derive(Debug, Clone)]
pub struct SnFileCollector {
    path: PathBuf,
}

impl SnFileCollector {
    /// Create a collector for the given serial-number file.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FingerprintCollector for SnFileCollector {
    fn collect(&self) -> ActivateResult<String> {
        let raw = std::fs::read_to_string(&self.path).map_err(|e| {
            ActivateError::Fingerprint(format!("failed to read {}: {e}", self.path.display()))
        })?;

        let sn = raw.trim();
        if sn.is_empty() {
            return Err(ActivateError::Fingerprint(format!(
                "{} is empty",
                self.path.display()
            )));
        }
        Ok(sn.to_string())
    }
}

/// Collector returning an operator-supplied literal value.
#[derive(Debug, Clone)]
pub struct InputCollector {
    value: String,
}

impl InputCollector {
    /// Create a collector for the given literal value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

impl FingerprintCollector for InputCollector {
    fn collect(&self) -> ActivateResult<String> {
        if self.value.is_empty() {
            return Err(ActivateError::Fingerprint(
                "configured fingerprint value is empty".into(),
            ));
        }
        Ok(self.value.clone())
    }
}
