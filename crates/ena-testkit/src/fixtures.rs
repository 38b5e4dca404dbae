//! Canned activation documents.

/// A well-formed activation response for `node` in `namespace`.
///
/// Certificate material is placeholder text; tests assert it flows through
/// to the sync configuration unchanged.
#[must_use]
pub fn activation_response(node: &str, namespace: &str) -> serde_json::Value {
    serde_json::json!({
        "nodeName": node,
        "namespace": namespace,
        "certificate": {
            "ca": "CA",
            "cert": "CERT",
            "key": "KEY",
            "name": "bundle-1"
        }
    })
}
