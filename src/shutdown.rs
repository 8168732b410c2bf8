//! Cooperative cancellation for a running harvest.
//!
//! The crawler and the pipeline race their network fetches and inter-page
//! pauses against [`Shutdown::cancelled`]; when it fires they stop and return
//! what they already collected.

use tokio::sync::watch;

/// Receiving half, cloned into every stage that can be interrupted.
#[derive(Debug, Clone)]
pub struct Shutdown {
    rx: watch::Receiver<bool>,
}

/// Sending half, held by whoever decides to stop (e.g. the Ctrl-C handler).
#[derive(Debug)]
pub struct ShutdownTrigger {
    tx: watch::Sender<bool>,
}

impl Shutdown {
    pub fn new() -> (ShutdownTrigger, Shutdown) {
        let (tx, rx) = watch::channel(false);
        (ShutdownTrigger { tx }, Shutdown { rx })
    }

    /// A handle that is never cancelled.
    pub fn never() -> Self {
        let (_trigger, shutdown) = Self::new();
        shutdown
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once the trigger fires. If the trigger is dropped without
    /// firing, this never resolves.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

impl ShutdownTrigger {
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }
}
