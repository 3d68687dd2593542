// src/supervisor/signal.rs

//! Wait for the signal that ends a `zinc run` session.

use tracing::{info, warn};

/// Signal handlers registered up front, so a signal that arrives while the
/// watchers are still being launched is caught rather than killing zinc.
#[derive(Debug)]
pub struct ShutdownSignal {
    #[cfg(unix)]
    listeners: tokio::task::JoinSet<&'static str>,
}

impl ShutdownSignal {
    /// Register handlers for Ctrl-C, and on unix also SIGTERM, SIGQUIT and
    /// SIGABRT. Must be called inside the runtime.
    #[cfg(unix)]
    pub fn install() -> Self {
        use tokio::signal::unix::{SignalKind, signal};

        let kinds = [
            ("SIGINT", SignalKind::interrupt()),
            ("SIGTERM", SignalKind::terminate()),
            ("SIGQUIT", SignalKind::quit()),
            ("SIGABRT", SignalKind::from_raw(6)),
        ];

        // One listener per installed handler; whichever fires first wins.
        let mut listeners = tokio::task::JoinSet::new();
        for (name, kind) in kinds {
            match signal(kind) {
                Ok(mut stream) => {
                    listeners.spawn(async move {
                        stream.recv().await;
                        name
                    });
                }
                Err(e) => warn!(signal = name, error = %e, "failed to install signal handler"),
            }
        }

        Self { listeners }
    }

    #[cfg(not(unix))]
    pub fn install() -> Self {
        Self {}
    }

    /// Resolves once the first shutdown signal arrives.
    #[cfg(unix)]
    pub async fn recv(mut self) {
        match self.listeners.join_next().await {
            Some(Ok(name)) => info!(signal = name, "received shutdown signal, stopping watchers"),
            _ => wait_for_ctrl_c().await,
        }
    }

    #[cfg(not(unix))]
    pub async fn recv(self) {
        wait_for_ctrl_c().await
    }
}

async fn wait_for_ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("received Ctrl+C, stopping watchers"),
        Err(e) => {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    }
}
