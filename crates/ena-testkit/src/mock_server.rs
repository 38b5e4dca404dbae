//! Mock cloud control plane for activation tests.

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

/// A mock control plane serving the activation endpoint.
///
/// Wraps wiremock with the response shapes the activation loop encounters
/// in the field: well-formed grants, error statuses, malformed bodies, and
/// outages that recover.
pub struct MockControlPlane {
    server: MockServer,
}

impl MockControlPlane {
    /// Start a new mock control plane.
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL, suitable as the agent's `cloud.address`.
    #[must_use]
    pub fn base_url(&self) -> String {
        self.server.uri()
    }

    /// The underlying wiremock server, for advanced configuration.
    #[must_use]
    pub const fn inner(&self) -> &MockServer {
        &self.server
    }

    /// Grant every activation POST to `request_path` with `response`.
    pub async fn expect_activation(&self, request_path: &str, response: serde_json::Value) {
        Mock::given(method("POST"))
            .and(path(request_path))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(response)
                    .insert_header("content-type", "application/json"),
            )
            .mount(&self.server)
            .await;
    }

    /// Answer every activation POST to `request_path` with an error status.
    pub async fn expect_activation_error(&self, request_path: &str, status: u16) {
        Mock::given(method("POST"))
            .and(path(request_path))
            .respond_with(
                ResponseTemplate::new(status)
                    .set_body_json(serde_json::json!({"message": "activation rejected"}))
                    .insert_header("content-type", "application/json"),
            )
            .mount(&self.server)
            .await;
    }

    /// Answer every activation POST with HTTP 200 and a body that is not a
    /// well-formed activation response.
    pub async fn expect_activation_garbage(&self, request_path: &str) {
        Mock::given(method("POST"))
            .and(path(request_path))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("{\"nodeName\": ", "application/json"),
            )
            .mount(&self.server)
            .await;
    }

    /// Fail the first `failures` activation POSTs with HTTP 500, then grant
    /// every subsequent one with `response`.
    pub async fn fail_then_succeed(
        &self,
        request_path: &str,
        failures: u64,
        response: serde_json::Value,
    ) {
        Mock::given(method("POST"))
            .and(path(request_path))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(serde_json::json!({"message": "not ready"}))
                    .insert_header("content-type", "application/json"),
            )
            .up_to_n_times(failures)
            .mount(&self.server)
            .await;

        self.expect_activation(request_path, response).await;
    }

    /// All requests the server has received so far.
    pub async fn received_requests(&self) -> Vec<Request> {
        self.server.received_requests().await.unwrap_or_default()
    }

    /// Number of requests the server has received so far.
    pub async fn request_count(&self) -> usize {
        self.received_requests().await.len()
    }
}
