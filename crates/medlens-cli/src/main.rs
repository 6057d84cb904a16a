#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;

use std::process;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use medlens_core::LifecycleManager;
use medlens_server::handler::routes;
use medlens_server::middleware::{
    RouterObservabilityExt, RouterOpenApiExt, RouterRecoveryExt, RouterSecurityExt,
};
use medlens_server::service::ServiceState;

use crate::config::{Cli, MiddlewareConfig};

// Tracing target constants
pub const TRACING_TARGET_SERVER_STARTUP: &str = "medlens_cli::server::startup";
pub const TRACING_TARGET_SERVER_SHUTDOWN: &str = "medlens_cli::server::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "medlens_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            "Application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = %format!("{error:#}"),
            "Application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();
    cli.init_tracing();

    tracing::info!(
        target: TRACING_TARGET_SERVER_STARTUP,
        version = env!("CARGO_PKG_VERSION"),
        "Starting medlens server"
    );

    cli.validate()?;
    cli.log();

    let lifecycle = load_engines(&cli).await?;
    let state = ServiceState::from_config(&cli.service, lifecycle);
    let router = create_router(state, &cli.middleware);

    server::serve(router, cli.server).await?;
    Ok(())
}

/// Builds the engine lifecycle and loads both models before serving.
///
/// A load failure aborts startup unless degraded serving is enabled.
async fn load_engines(cli: &Cli) -> anyhow::Result<Arc<LifecycleManager>> {
    let lifecycle = cli
        .lifecycle()
        .context("failed to create inference engines")?;

    match lifecycle.initialize().await {
        Ok(()) => {
            tracing::info!(
                target: TRACING_TARGET_SERVER_STARTUP,
                models = ?lifecycle.model_names(),
                "Inference engines loaded"
            );
        }
        Err(error) if cli.engine.serve_degraded => {
            tracing::warn!(
                target: TRACING_TARGET_SERVER_STARTUP,
                error = %error,
                readiness = ?lifecycle.readiness(),
                "Serving with missing models"
            );
        }
        Err(error) => return Err(error).context("failed to load inference engines"),
    }

    Ok(Arc::new(lifecycle))
}

/// Creates the router with all middleware layers applied.
///
/// Middleware is applied in reverse order (last added = outermost):
/// 1. Recovery (outermost) - converts panics into 500 responses
/// 2. Observability - request IDs and tracing spans
/// 3. Security - CORS, body limit, content-type sniffing
/// 4. Routes (innermost) - handlers and the OpenAPI document
fn create_router(state: ServiceState, middleware: &MiddlewareConfig) -> Router {
    routes()
        .with_open_api(&middleware.openapi)
        .with_state(state)
        .with_security(&middleware.cors)
        .with_observability()
        .with_default_recovery()
}
