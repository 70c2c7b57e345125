//! Shutdown coordination for the engine.

use std::future::Future;

use tokio::sync::broadcast;

/// Coordinator for graceful shutdown.
///
/// Provides a broadcast channel that serving tasks subscribe to. Clones share
/// the channel, so any clone can trigger from any thread.
#[derive(Debug, Clone)]
pub struct Shutdown {
    /// Broadcast channel sender.
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Get the number of active subscribers (tasks still running).
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Future resolving on `trigger`, or on Ctrl+C when `stop_on_signal` is set.
    ///
    /// Subscribes immediately, so a trigger issued after this call is never missed.
    pub fn signal(&self, stop_on_signal: bool) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.subscribe();
        async move {
            if stop_on_signal {
                tokio::select! {
                    _ = rx.recv() => {}
                    _ = ctrl_c() => {
                        tracing::info!("Shutdown signal received");
                    }
                }
            } else {
                let _ = rx.recv().await;
            }
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves on Ctrl+C; never resolves if the handler cannot be installed.
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
}
