//! Configuration model for the ENA edge-node agent.
//!
//! This crate defines the configuration consumed by the agent at startup and
//! the shared synchronization configuration populated by node activation.
//!
//! # Overview
//!
//! - [`AgentConfig`] - Top-level process configuration loaded from TOML
//! - [`BatchIdentity`] - Provisioning batch membership and shared secret
//! - [`CloudConfig`] - Cloud control-plane endpoint settings
//! - [`FingerprintConfig`] - How device identity proof is sourced
//! - [`SyncConfigWriter`] / [`SyncConfigReader`] - Single-writer handle pair
//!   over the sync configuration that activation populates
//!
//! [`BatchIdentity`] and [`CloudConfig`] are loaded once at process start and
//! are read-only thereafter. The sync configuration starts empty and becomes
//! populated exactly when activation succeeds; readers must treat it as
//! invalid until the activation completion signal has fired.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod sync;

pub use sync::{sync_config_pair, CertificateSet, NodeInfo, SyncConfig, SyncConfigReader, SyncConfigWriter};

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default path of the agent configuration file.
pub const DEFAULT_CONF_PATH: &str = "etc/ena/agent.toml";

/// Default activation endpoint path on the cloud control plane.
pub const DEFAULT_ACTIVE_URL: &str = "/v1/active";

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file is not valid TOML.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Configuration is structurally valid but semantically unusable.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration for the edge-node agent process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Provisioning batch this node belongs to.
    pub batch: BatchIdentity,

    /// Cloud control-plane endpoint settings.
    pub cloud: CloudConfig,

    /// How the device identity proof is sourced.
    pub fingerprint: FingerprintConfig,

    /// Operator-supplied pass-through attributes, forwarded opaquely in
    /// every activation request.
    #[serde(default)]
    pub attrs: HashMap<String, String>,
}

impl AgentConfig {
    /// Load and validate configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML, or
    /// fails [`AgentConfig::validate`].
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the offending field.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.batch.name.is_empty() {
            return Err(ConfigError::Invalid("batch.name must not be empty".into()));
        }
        if self.batch.namespace.is_empty() {
            return Err(ConfigError::Invalid(
                "batch.namespace must not be empty".into(),
            ));
        }
        self.cloud.validate()?;
        self.fingerprint.validate()
    }
}

/// Identity of the provisioning batch this node belongs to.
///
/// The batch name and shared secret prove batch membership to the cloud
/// control plane during activation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchIdentity {
    /// Batch name.
    pub name: String,

    /// Namespace the batch lives in.
    pub namespace: String,

    /// Kind of secret used to authenticate (e.g. a pre-shared key class).
    /// Carried as an opaque string; the control plane owns the vocabulary.
    pub security_type: String,

    /// Shared secret proving batch membership.
    pub security_key: String,
}

/// Cloud control-plane endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudConfig {
    /// Base HTTP(S) address of the control plane (e.g. `https://cloud.example.com`).
    pub address: String,

    /// Activation endpoint path, appended to `address`.
    #[serde(default = "default_active_url")]
    pub active_url: String,

    /// Fixed interval between activation attempts.
    #[serde(default = "default_interval", with = "duration_secs")]
    pub interval: Duration,

    /// Per-request transport timeout.
    #[serde(default = "default_timeout", with = "duration_secs")]
    pub timeout: Duration,
}

impl CloudConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.address.is_empty() {
            return Err(ConfigError::Invalid(
                "cloud.address must not be empty".into(),
            ));
        }
        if !self.active_url.starts_with('/') {
            return Err(ConfigError::Invalid(
                "cloud.active_url must start with '/'".into(),
            ));
        }
        if self.interval.is_zero() {
            return Err(ConfigError::Invalid(
                "cloud.interval must be greater than zero".into(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::Invalid(
                "cloud.timeout must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

fn default_active_url() -> String {
    DEFAULT_ACTIVE_URL.into()
}

fn default_interval() -> Duration {
    Duration::from_secs(30)
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

/// How the device identity proof (fingerprint) is sourced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FingerprintConfig {
    /// Proof kind.
    pub proof: FingerprintProof,

    /// Proof argument: a file path for [`FingerprintProof::SnFile`], the
    /// literal value for [`FingerprintProof::Input`].
    pub value: String,
}

impl FingerprintConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.value.is_empty() {
            return Err(ConfigError::Invalid(
                "fingerprint.value must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Supported device identity proof kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FingerprintProof {
    /// Read a serial number from a file on the device.
    SnFile,
    /// Use an operator-supplied literal value.
    Input,
}
