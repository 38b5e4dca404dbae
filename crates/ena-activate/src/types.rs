//! Activation wire types.
//!
//! Field names follow the control-plane JSON contract (`batchName`,
//! `securityType`, ...). Request and response values are ephemeral:
//! constructed per attempt and discarded once the attempt resolves.

use std::collections::HashMap;

use ena_config::CertificateSet;
use serde::{Deserialize, Serialize};

/// Outbound activation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationRequest {
    /// Provisioning batch name.
    pub batch_name: String,

    /// Batch namespace.
    pub namespace: String,

    /// Kind of secret used to authenticate.
    pub security_type: String,

    /// Shared secret associated with the batch.
    pub security_value: String,

    /// Device identity proof, collected fresh for every attempt.
    pub fingerprint_value: String,

    /// Opaque operator-supplied pass-through attributes.
    pub penetrate_data: HashMap<String, String>,
}

/// Inbound activation response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationResponse {
    /// Cloud-assigned node name.
    pub node_name: String,

    /// Namespace the node was placed in.
    pub namespace: String,

    /// Issued TLS trust bundle.
    pub certificate: CertificateSet,
}
