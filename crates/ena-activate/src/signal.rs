//! Activation completion signal.
//!
//! A bounded, non-blocking notification primitive: the activation
//! controller writes, startup orchestration reads. Capacity is one, so the
//! writer never blocks on a slow or absent reader, and a pending
//! un-consumed notification simply absorbs further successes.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::debug;

/// Create the completion signal pair.
#[must_use]
pub fn completion_channel() -> (CompletionSignal, CompletionListener) {
    let (tx, rx) = mpsc::channel(1);
    (CompletionSignal { tx }, CompletionListener { rx })
}

/// Write side of the completion signal, held by the activation controller.
#[derive(Debug, Clone)]
pub struct CompletionSignal {
    tx: mpsc::Sender<()>,
}

impl CompletionSignal {
    /// Announce that trust material is available.
    ///
    /// Never blocks and never fails the activation path: if a notification
    /// is already pending it is left in place, and a dropped listener is
    /// tolerated.
    pub fn notify(&self) {
        match self.tx.try_send(()) {
            Ok(()) => {}
            Err(TrySendError::Full(())) => {
                // A pending notification already covers this success.
            }
            Err(TrySendError::Closed(())) => {
                debug!("completion listener dropped; activation signal discarded");
            }
        }
    }
}

/// Read side of the completion signal.
#[derive(Debug)]
pub struct CompletionListener {
    rx: mpsc::Receiver<()>,
}

impl CompletionListener {
    /// Wait for the next completion notification.
    ///
    /// Returns `true` when activation has succeeded, or `false` if every
    /// signal handle was dropped without a success (the process is shutting
    /// down before the node ever activated).
    pub async fn wait(&mut self) -> bool {
        self.rx.recv().await.is_some()
    }

    /// Consume a pending notification without waiting.
    ///
    /// Returns `true` if a notification was pending.
    pub fn try_consume(&mut self) -> bool {
        self.rx.try_recv().is_ok()
    }
}
