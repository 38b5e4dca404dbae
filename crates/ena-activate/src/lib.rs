//! Node activation (bootstrap trust) for the ENA edge-node agent.
//!
//! Activation is the handshake by which an unprovisioned edge node proves
//! its identity to the cloud control plane and receives back the node
//! identity and TLS trust bundle the synchronization component needs.
//!
//! # Overview
//!
//! - [`ActivationController`] - Owns the activation lifecycle: builds each
//!   request, interprets the response, populates the shared sync
//!   configuration, and signals completion
//! - [`ActivationClient`] - Typed HTTP client for the activation endpoint
//! - [`ActivationRequest`] / [`ActivationResponse`] - Wire types
//! - [`FingerprintCollector`] - Seam for device-identity collection
//! - [`completion_channel`] - One-shot-style handoff announcing that trust
//!   material is available
//!
//! # Lifecycle
//!
//! The host process spawns [`ActivationController::run`] as a background
//! task at boot. The loop fires immediately, then at a fixed configured
//! interval, until an attempt succeeds or shutdown is requested. Individual
//! failures are logged and retried at the next tick; the loop has no retry
//! cap and no backoff growth. A node that never activates loops forever at
//! the configured interval, which is the intended wait-for-cloud behavior.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod controller;
mod error;
mod fingerprint;
mod signal;
mod types;

pub use client::ActivationClient;
pub use controller::ActivationController;
pub use error::{ActivateError, ActivateResult};
pub use fingerprint::{FingerprintCollector, InputCollector, SnFileCollector};
pub use signal::{completion_channel, CompletionListener, CompletionSignal};
pub use types::{ActivationRequest, ActivationResponse};
