//! Activation controller: state machine and background loop.

use std::collections::HashMap;
use std::time::Duration;

use ena_config::{AgentConfig, BatchIdentity, NodeInfo, SyncConfigWriter};
use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::client::ActivationClient;
use crate::error::ActivateResult;
use crate::fingerprint::FingerprintCollector;
use crate::signal::CompletionSignal;
use crate::types::ActivationRequest;

/// Owns the activation lifecycle.
///
/// The controller moves through `Idle -> Attempting -> (Succeeded | Failed
/// -> Idle)`. Failure always returns to idle and waits for the next tick;
/// success stops the loop. Attempts are strictly sequential: a second
/// request is never issued while one is outstanding.
pub struct ActivationController {
    batch: BatchIdentity,
    attrs: HashMap<String, String>,
    interval: Duration,
    client: ActivationClient,
    collector: Box<dyn FingerprintCollector>,
    sync: SyncConfigWriter,
    signal: CompletionSignal,
}

impl ActivationController {
    /// Create a controller from agent configuration and its collaborators.
    ///
    /// The batch identity, pass-through attributes, and polling interval
    /// are drawn from `config`; the sync-config writer makes this
    /// controller the sole writer of the shared sync configuration.
    #[must_use]
    pub fn new(
        config: &AgentConfig,
        client: ActivationClient,
        collector: Box<dyn FingerprintCollector>,
        sync: SyncConfigWriter,
        signal: CompletionSignal,
    ) -> Self {
        Self {
            batch: config.batch.clone(),
            attrs: config.attrs.clone(),
            interval: config.cloud.interval,
            client,
            collector,
            sync,
            signal,
        }
    }

    /// Run the activation loop until success or shutdown.
    ///
    /// Fires one attempt immediately, then one per configured interval.
    /// Shutdown is cooperative: it is observed at the timer wait point, so
    /// an in-flight attempt completes or aborts on its own before the task
    /// exits. Invoking `run` again after a success performs a fresh
    /// attempt; callers needing at-most-once semantics gate externally.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        loop {
            if *shutdown.borrow() {
                info!("activation loop received shutdown signal");
                return;
            }

            match self.activate_once().await {
                Ok(()) => {
                    info!("node activated");
                    return;
                }
                Err(e) => error!(error = %e, "activation attempt failed"),
            }

            tokio::select! {
                () = tokio::time::sleep(self.interval) => {}
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!("activation loop received shutdown signal");
                        return;
                    }
                }
            }
        }
    }

    /// Perform a single activation attempt.
    ///
    /// Either leaves the sync configuration untouched and signals nothing
    /// (any failure), or populates node identity plus certificate bundle in
    /// one step and then signals completion. Exactly one outbound call is
    /// made per invocation, and only after fingerprint collection succeeds.
    ///
    /// # Errors
    ///
    /// Any [`ActivateError`](crate::ActivateError); all variants leave
    /// shared state untouched.
    pub async fn activate_once(&mut self) -> ActivateResult<()> {
        let fingerprint = self.collector.collect()?;

        let request = ActivationRequest {
            batch_name: self.batch.name.clone(),
            namespace: self.batch.namespace.clone(),
            security_type: self.batch.security_type.clone(),
            security_value: self.batch.security_key.clone(),
            fingerprint_value: fingerprint,
            penetrate_data: self.attrs.clone(),
        };

        let response = self.client.activate(&request).await?;

        debug!(
            node = %response.node_name,
            namespace = %response.namespace,
            certificate = %response.certificate.name,
            "activation accepted by control plane"
        );

        self.sync.apply(
            NodeInfo {
                name: response.node_name,
                namespace: response.namespace,
            },
            response.certificate,
        );
        self.signal.notify();

        Ok(())
    }
}
