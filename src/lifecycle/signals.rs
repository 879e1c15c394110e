//! OS signal handling.
//!
//! # Responsibilities
//! - Wait for SIGINT (Ctrl+C) or SIGTERM
//! - Translate the first one into a shutdown trigger
//! - Notice a server task that exits on its own

use std::future::Future;
use tokio::task::{JoinError, JoinHandle};

use crate::lifecycle::Shutdown;

/// Resolve when the process is asked to stop.
pub async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Wait for `server` to finish, triggering `shutdown` if `signal` fires first.
pub async fn supervise<F, T>(
    shutdown: &Shutdown,
    signal: F,
    mut server: JoinHandle<T>,
) -> Result<T, JoinError>
where
    F: Future<Output = ()>,
{
    tokio::select! {
        _ = signal => {
            tracing::info!("Shutdown signal received");
            shutdown.trigger();
            server.await
        }
        result = &mut server => {
            tracing::error!("Server task exited before a shutdown signal");
            result
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_early_server_exit_does_not_wait_for_signal() {
        let shutdown = Shutdown::new();
        let server = tokio::spawn(async { Err::<(), &str>("bind lost") });

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            supervise(&shutdown, std::future::pending(), server),
        )
        .await
        .expect("supervise hung on a dead server");
        assert_eq!(result.unwrap(), Err("bind lost"));
    }

    #[tokio::test]
    async fn test_signal_triggers_shutdown() {
        let shutdown = Shutdown::new();
        let mut rx = shutdown.subscribe();
        let server = tokio::spawn(async move {
            let _ = rx.recv().await;
            "drained"
        });

        let result = supervise(&shutdown, async {}, server).await;
        assert_eq!(result.unwrap(), "drained");
    }
}
