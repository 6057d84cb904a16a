//! Startup warnings and exit reporting around the serve future.

use std::future::Future;
use std::io;
use std::time::Instant;

use crate::config::ServerConfig;
use crate::{TRACING_TARGET_SERVER_SHUTDOWN, TRACING_TARGET_SERVER_STARTUP};

/// Runs `serve_fn` and logs how the server stopped.
///
/// # Errors
///
/// Passes the server's IO error through after logging it together with a
/// recovery suggestion when one is known.
pub async fn serve_with_shutdown<F>(
    server_config: &ServerConfig,
    serve_fn: impl FnOnce() -> F,
) -> io::Result<()>
where
    F: Future<Output = io::Result<()>>,
{
    let start_time = Instant::now();

    if server_config.binds_to_all_interfaces() {
        tracing::warn!(
            target: TRACING_TARGET_SERVER_STARTUP,
            "Server bound to all interfaces - ensure firewall is configured"
        );
    }

    let result = serve_fn().await;
    handle_result(result, start_time)
}

fn handle_result(result: io::Result<()>, start_time: Instant) -> io::Result<()> {
    let uptime = start_time.elapsed();

    match result {
        Ok(()) => {
            tracing::info!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                uptime_secs = uptime.as_secs(),
                "Shutdown completed"
            );
            Ok(())
        }
        Err(err) => {
            tracing::error!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                error = %err,
                kind = ?err.kind(),
                uptime_secs = uptime.as_secs(),
                "Fatal error"
            );

            if let Some(suggestion) = error_suggestion(&err) {
                tracing::info!(
                    target: TRACING_TARGET_SERVER_SHUTDOWN,
                    suggestion = suggestion,
                    "Recovery suggestion"
                );
            }

            Err(err)
        }
    }
}

fn error_suggestion(err: &io::Error) -> Option<&'static str> {
    match err.kind() {
        io::ErrorKind::PermissionDenied => {
            Some("Try using a port above 1024 or run with appropriate privileges")
        }
        io::ErrorKind::AddrInUse => {
            Some("The port is already in use. Try a different port or stop the conflicting service")
        }
        io::ErrorKind::AddrNotAvailable => {
            Some("The address is not available. Check network interface configuration")
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn clean_exit_is_ok() {
        let config = ServerConfig::default();
        let result = serve_with_shutdown(&config, || async { Ok(()) }).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn server_error_is_returned() {
        let config = ServerConfig::default();
        let result = serve_with_shutdown(&config, || async {
            Err(io::Error::from(io::ErrorKind::AddrInUse))
        })
        .await;

        let err = result.expect_err("server error should propagate");
        assert_eq!(err.kind(), io::ErrorKind::AddrInUse);
    }

    #[test]
    fn suggestions_for_bind_failures() {
        assert!(error_suggestion(&io::Error::from(io::ErrorKind::AddrInUse)).is_some());
        assert!(error_suggestion(&io::Error::other("boom")).is_none());
    }
}
