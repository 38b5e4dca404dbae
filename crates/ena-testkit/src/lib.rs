//! Test tooling for the ENA edge-node agent.
//!
//! - [`MockControlPlane`] - wiremock-backed stand-in for the cloud
//!   activation endpoint, with helpers for success, failure, malformed, and
//!   fail-then-succeed response sequences
//! - [`CountingCollector`] / [`FailingCollector`] - scripted fingerprint
//!   collectors for asserting collection behavior
//! - [`fixtures`] - canned activation documents
//! - [`init_test_tracing`] - tracing setup for test output
//!
//! # Example
//!
//! ```rust,ignore
//! use ena_testkit::{fixtures, MockControlPlane};
//!
//! #[tokio::test]
//! async fn activates_against_mock_cloud() {
//!     let cloud = MockControlPlane::start().await;
//!     cloud
//!         .expect_activation("/v1/active", fixtures::activation_response("node-7", "ns1"))
//!         .await;
//!     // point the agent at cloud.base_url() ...
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod collectors;
pub mod fixtures;
mod mock_server;
mod tracing_config;

pub use collectors::{CountingCollector, FailingCollector};
pub use mock_server::MockControlPlane;
pub use tracing_config::init_test_tracing;
