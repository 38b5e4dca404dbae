//! HTTP client for the cloud activation endpoint.

use ena_config::CloudConfig;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use crate::error::{ActivateError, ActivateResult};
use crate::types::{ActivationRequest, ActivationResponse};

/// Typed client for the activation endpoint.
///
/// One [`activate`](Self::activate) call issues exactly one outbound POST.
/// There are no internal retries: the controller's fixed interval is the
/// sole throttle on activation traffic.
#[derive(Debug)]
pub struct ActivationClient {
    client: reqwest::Client,
    address: String,
    active_url: String,
}

impl ActivationClient {
    /// Create a client from the cloud endpoint settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(cloud: &CloudConfig) -> ActivateResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(cloud.timeout)
            .build()?;

        Ok(Self {
            client,
            address: cloud.address.clone(),
            active_url: cloud.active_url.clone(),
        })
    }

    /// Full URL of the activation endpoint.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.address, self.active_url)
    }

    /// Send one activation request and parse the response.
    ///
    /// # Errors
    ///
    /// - [`ActivateError::Serialize`] if the request cannot be encoded
    /// - [`ActivateError::Http`] on transport failure
    /// - [`ActivateError::Endpoint`] on a non-2xx status; the body is never
    ///   parsed as a valid response in that case
    /// - [`ActivateError::Parse`] if a 2xx body is not a well-formed
    ///   activation response
    pub async fn activate(
        &self,
        request: &ActivationRequest,
    ) -> ActivateResult<ActivationResponse> {
        let body = serde_json::to_vec(request).map_err(ActivateError::Serialize)?;
        let url = self.endpoint();

        debug!(url = %url, "sending activation request");

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ActivateError::Endpoint {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ActivateError::Parse(e.to_string()))
    }
}
