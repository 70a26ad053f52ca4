//! Graceful stop of the `docket` harness.
//!
//! Only the SIGHUP reload loop runs in the background. It subscribes here and
//! returns once the stop is triggered, so a reload already in flight finishes
//! and publishes (or is rejected) before the process exits.

use tokio::sync::broadcast;

/// One-shot stop signal fanned out to background tasks.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver for a task that must stop with the harness.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Stop every subscribed task. Without subscribers this does nothing.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
