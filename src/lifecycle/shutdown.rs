//! Signal handling for graceful shutdown

use tokio::signal::unix::{signal, SignalKind};
use tracing::{debug, warn};

/// Why the daemon is stopping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    Terminate,
    Interrupt,
}

impl std::fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShutdownReason::Terminate => write!(f, "SIGTERM"),
            ShutdownReason::Interrupt => write!(f, "SIGINT"),
        }
    }
}

/// Handles shutdown signals (SIGTERM, SIGINT)
pub struct ShutdownSignal;

impl ShutdownSignal {
    pub fn new() -> Self {
        Self
    }

    /// Wait for a shutdown signal
    ///
    /// Falls back to Ctrl-C alone if SIGTERM cannot be registered.
    pub async fn wait(&self) -> ShutdownReason {
        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(e) => {
                warn!(?e, "failed to register SIGTERM handler");
                return Self::wait_interrupt().await;
            }
        };

        tokio::select! {
            _ = sigterm.recv() => {
                debug!("received SIGTERM");
                ShutdownReason::Terminate
            }
            reason = Self::wait_interrupt() => reason,
        }
    }

    async fn wait_interrupt() -> ShutdownReason {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(?e, "failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
        debug!("received SIGINT");
        ShutdownReason::Interrupt
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}
