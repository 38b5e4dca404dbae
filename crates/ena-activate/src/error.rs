//! Error types for node activation.

use thiserror::Error;

/// Result type for activation operations.
pub type ActivateResult<T> = Result<T, ActivateError>;

/// Errors that can occur during an activation attempt.
///
/// Every variant is non-fatal to the activation loop: the controller logs
/// the error, abandons the attempt without mutating any shared state, and
/// retries at the next tick.
#[derive(Debug, Error)]
pub enum ActivateError {
    /// Device identity collection failed; no request is sent.
    #[error("failed to collect fingerprint value: {0}")]
    Fingerprint(String),

    /// Activation request could not be serialized.
    #[error("failed to serialize activation request: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Transport failure (connection error, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("activation endpoint returned {status}: {body}")]
    Endpoint {
        /// HTTP status code.
        status: u16,
        /// Response body, as far as it could be read.
        body: String,
    },

    /// Response body could not be parsed as an activation response.
    #[error("failed to parse activation response: {0}")]
    Parse(String),
}
