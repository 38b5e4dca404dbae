//! Shared synchronization configuration populated by node activation.
//!
//! The sync configuration has a single writer (the activation controller)
//! and arbitrary readers (the synchronization component, startup
//! orchestration). The writer/reader split below enforces that discipline
//! through ownership: [`SyncConfigWriter`] is not cloneable, so only one
//! component can ever hold it.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Node identity issued by the cloud control plane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInfo {
    /// Cloud-assigned node name.
    pub name: String,

    /// Namespace the node was placed in.
    pub namespace: String,
}

/// TLS certificate bundle for the cloud-facing HTTP client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateSet {
    /// CA certificate (PEM).
    pub ca: String,

    /// Leaf certificate (PEM).
    pub cert: String,

    /// Private key (PEM).
    pub key: String,

    /// Identifier of the certificate bundle.
    pub name: String,
}

/// Configuration consumed by the synchronization component once the node
/// has activated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Cloud-issued node identity.
    pub node: NodeInfo,

    /// Trust bundle securing the cloud-facing HTTP channel.
    pub cloud_http: CertificateSet,
}

/// Create the writer/reader pair over an initially empty sync configuration.
#[must_use]
pub fn sync_config_pair() -> (SyncConfigWriter, SyncConfigReader) {
    let inner = Arc::new(RwLock::new(None));
    (
        SyncConfigWriter {
            inner: Arc::clone(&inner),
        },
        SyncConfigReader { inner },
    )
}

/// Exclusive write handle over the sync configuration.
///
/// Deliberately not `Clone`: handing this to the activation controller makes
/// it the only possible writer for the life of the process.
#[derive(Debug)]
pub struct SyncConfigWriter {
    inner: Arc<RwLock<Option<SyncConfig>>>,
}

impl SyncConfigWriter {
    /// Replace the entire configuration in one step.
    ///
    /// All five fields (node name, node namespace, and the certificate
    /// bundle) become visible to readers together; a reader can never
    /// observe a mix of old and new values.
    pub fn apply(&mut self, node: NodeInfo, cloud_http: CertificateSet) {
        *self.inner.write() = Some(SyncConfig { node, cloud_http });
    }
}

/// Shared read handle over the sync configuration.
#[derive(Debug, Clone)]
pub struct SyncConfigReader {
    inner: Arc<RwLock<Option<SyncConfig>>>,
}

impl SyncConfigReader {
    /// Whether activation has populated the configuration yet.
    #[must_use]
    pub fn is_populated(&self) -> bool {
        self.inner.read().is_some()
    }

    /// Coherent copy of the configuration, or `None` before first activation.
    #[must_use]
    pub fn snapshot(&self) -> Option<SyncConfig> {
        self.inner.read().clone()
    }
}
