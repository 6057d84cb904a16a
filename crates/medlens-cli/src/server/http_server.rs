//! HTTP server startup.

use std::future::IntoFuture;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::lifecycle::serve_with_shutdown;
use super::shutdown::{shutdown_signal, with_shutdown_deadline};
use crate::TRACING_TARGET_SERVER_STARTUP;
use crate::config::ServerConfig;

/// Binds to the configured address and serves until a shutdown signal.
///
/// After the signal, in-flight requests get up to the configured shutdown
/// timeout to finish; connections still open after that are dropped.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails
/// while running.
pub async fn serve(app: Router, server_config: ServerConfig) -> io::Result<()> {
    let server_addr = server_config.server_addr();

    let listener = TcpListener::bind(server_addr).await.inspect_err(|err| {
        tracing::error!(
            target: TRACING_TARGET_SERVER_STARTUP,
            addr = %server_addr,
            error = %err,
            "Failed to bind to address"
        );
    })?;

    tracing::info!(
        target: TRACING_TARGET_SERVER_STARTUP,
        addr = %server_addr,
        "Server is ready and listening for connections"
    );

    let timeout = server_config.shutdown_timeout();
    let stopping = Arc::new(Notify::new());
    let shutdown = {
        let stopping = stopping.clone();
        async move {
            shutdown_signal(timeout).await;
            stopping.notify_one();
        }
    };

    serve_with_shutdown(&server_config, || async move {
        let server = axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown);

        with_shutdown_deadline(server.into_future(), stopping.notified(), timeout).await
    })
    .await
}
