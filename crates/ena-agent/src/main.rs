//! ENA edge-node agent host process.
//!
//! Boot order: load configuration, initialize logging, spawn the
//! activation controller as a background task, wait for the completion
//! signal (trust material ready) or an interrupt, then shut the loop down
//! cooperatively. The synchronization engine that consumes the populated
//! sync configuration runs as a separate component and is wired in through
//! the reader handle.

#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ena_activate::{
    completion_channel, ActivationClient, ActivationController, FingerprintCollector,
    InputCollector, SnFileCollector,
};
use ena_config::{sync_config_pair, AgentConfig, FingerprintConfig, FingerprintProof};

/// Environment variable overriding the configuration file path.
const CONF_ENV: &str = "ENA_AGENT_CONF";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let conf_path =
        std::env::var(CONF_ENV).unwrap_or_else(|_| ena_config::DEFAULT_CONF_PATH.to_string());
    let config = AgentConfig::load(&conf_path)
        .with_context(|| format!("failed to load configuration from {conf_path}"))?;

    tracing::info!(
        batch = %config.batch.name,
        namespace = %config.batch.namespace,
        cloud = %config.cloud.address,
        "edge-node agent starting"
    );

    let (sync_writer, sync_reader) = sync_config_pair();
    let (signal, mut listener) = completion_channel();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let client = ActivationClient::new(&config.cloud)?;
    let collector = build_collector(&config.fingerprint);
    let controller = ActivationController::new(&config, client, collector, sync_writer, signal);

    let activation = tokio::spawn(controller.run(shutdown_rx));

    tokio::select! {
        activated = listener.wait() => {
            if activated {
                if let Some(sync) = sync_reader.snapshot() {
                    tracing::info!(
                        node = %sync.node.name,
                        namespace = %sync.node.namespace,
                        certificate = %sync.cloud_http.name,
                        "node activated; sync configuration ready"
                    );
                }
                shutdown_signal().await;
            }
        }
        () = shutdown_signal() => {}
    }

    tracing::info!("shutting down");
    let _ = shutdown_tx.send(true);
    activation.await.context("activation task panicked")?;

    Ok(())
}

/// Map fingerprint configuration to a collector.
fn build_collector(config: &FingerprintConfig) -> Box<dyn FingerprintCollector> {
    match config.proof {
        FingerprintProof::SnFile => Box::new(SnFileCollector::new(config.value.clone())),
        FingerprintProof::Input => Box::new(InputCollector::new(config.value.clone())),
    }
}

/// Resolve when the process is asked to stop (SIGINT, or SIGTERM on unix).
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut term = match signal(SignalKind::terminate()) {
            Ok(term) => term,
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::warn!(error = %e, "failed to listen for ctrl-c");
                }
                return;
            }
        };

        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    tracing::warn!(error = %e, "failed to listen for ctrl-c");
                }
            }
            _ = term.recv() => {}
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for ctrl-c");
        }
    }
}
