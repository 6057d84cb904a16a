//! Graceful shutdown signal handling.

use std::future::Future;
use std::io;
use std::time::Duration;

use tokio::signal::ctrl_c;
#[cfg(unix)]
use tokio::signal::unix;

use crate::TRACING_TARGET_SERVER_SHUTDOWN;

/// Resolves on SIGINT (Ctrl+C) or, on Unix, SIGTERM.
pub async fn shutdown_signal(shutdown_timeout: Duration) {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            tracing::error!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                error = %e,
                "Failed to install Ctrl+C handler"
            );
        } else {
            tracing::info!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                "Received Ctrl+C signal, initiating graceful shutdown"
            );
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match unix::signal(unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
                tracing::info!(
                    target: TRACING_TARGET_SERVER_SHUTDOWN,
                    "Received SIGTERM signal, initiating graceful shutdown"
                );
            }
            Err(e) => {
                tracing::error!(
                    target: TRACING_TARGET_SERVER_SHUTDOWN,
                    error = %e,
                    "Failed to install SIGTERM handler"
                );
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!(
        target: TRACING_TARGET_SERVER_SHUTDOWN,
        timeout_secs = shutdown_timeout.as_secs(),
        "Graceful shutdown initiated"
    );
}

/// Runs `server` until it finishes, or until `timeout` has passed since
/// `stopping` resolved.
///
/// Hitting the deadline counts as a clean exit; open connections are dropped.
pub async fn with_shutdown_deadline<F, S>(server: F, stopping: S, timeout: Duration) -> io::Result<()>
where
    F: Future<Output = io::Result<()>>,
    S: Future<Output = ()>,
{
    let deadline = async {
        stopping.await;
        tokio::time::sleep(timeout).await;
    };

    tokio::select! {
        result = server => result,
        () = deadline => {
            tracing::warn!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                timeout_secs = timeout.as_secs(),
                "Shutdown timeout elapsed, dropping open connections"
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::future::{pending, ready};

    use super::*;

    #[tokio::test]
    async fn stalled_server_is_cut_off_after_timeout() {
        let result = tokio::time::timeout(
            Duration::from_secs(5),
            with_shutdown_deadline(
                pending::<io::Result<()>>(),
                ready(()),
                Duration::from_millis(10),
            ),
        )
        .await;

        assert!(matches!(result, Ok(Ok(()))));
    }

    #[tokio::test]
    async fn server_result_wins_before_shutdown() {
        let result = with_shutdown_deadline(
            ready(Err(io::Error::from(io::ErrorKind::AddrInUse))),
            pending::<()>(),
            Duration::from_millis(10),
        )
        .await;

        let err = result.expect_err("server error should propagate");
        assert_eq!(err.kind(), io::ErrorKind::AddrInUse);
    }

    #[tokio::test]
    async fn draining_server_finishes_within_timeout() {
        let server = async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            Ok(())
        };

        let result = with_shutdown_deadline(server, ready(()), Duration::from_secs(5)).await;
        assert!(result.is_ok());
    }
}
