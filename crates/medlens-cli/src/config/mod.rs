//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── server: ServerConfig          # Host, port, shutdown
//! ├── middleware: MiddlewareConfig  # CORS, OpenAPI paths
//! ├── service: ServiceConfig        # Request policy (length bounds)
//! ├── engine: EngineConfig          # Backend, degraded startup, log format
//! ├── huggingface: HuggingFaceConfig
//! └── mock: MockConfig              # feature = "mock"
//! ```
//!
//! All configuration can be provided via CLI arguments or environment
//! variables. Use `--help` to see all available options.

mod engine;
mod middleware;
mod server;

use std::process;

use anyhow::Context;
use clap::Parser;
use medlens_core::LifecycleManager;
use medlens_huggingface::HuggingFaceConfig;
use medlens_server::service::ServiceConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub use self::engine::{EngineBackend, EngineConfig, LogFormat};
pub use self::middleware::MiddlewareConfig;
pub use self::server::ServerConfig;
use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_SERVER_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "medlens")]
#[command(about = "Biomedical named-entity recognition and summarization server")]
#[command(version)]
pub struct Cli {
    /// Server network and lifecycle configuration.
    #[clap(flatten)]
    pub server: ServerConfig,

    /// HTTP middleware configuration.
    #[clap(flatten)]
    pub middleware: MiddlewareConfig,

    /// Request handling policy.
    #[clap(flatten)]
    pub service: ServiceConfig,

    /// Engine backend and startup policy.
    #[clap(flatten)]
    pub engine: EngineConfig,

    /// Hugging Face Inference API configuration.
    #[clap(flatten)]
    pub huggingface: HuggingFaceConfig,

    /// Model names reported by the mock engines.
    #[cfg(feature = "mock")]
    #[clap(flatten)]
    pub mock: medlens_core::mock::MockConfig,
}

impl Cli {
    /// Loads `.env` (if enabled) and parses CLI arguments.
    ///
    /// The `.env` file is read first so clap's `env` fallbacks can see it.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Installs the global subscriber: `RUST_LOG` filtering, text or JSON output.
    pub fn init_tracing(&self) {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let registry = tracing_subscriber::registry().with(filter);

        match self.engine.log_format {
            LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
            LogFormat::Json => registry
                .with(tracing_subscriber::fmt::layer().json())
                .init(),
        }
    }

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.server
            .validate()
            .context("invalid server configuration")?;
        Ok(())
    }

    /// Logs configuration (no secrets).
    pub fn log(&self) {
        Self::log_build_info();
        self.server.log();
        self.middleware.log();

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            backend = ?self.engine.engine_backend,
            serve_degraded = self.engine.serve_degraded,
            strict_length_bounds = self.service.strict_length_bounds,
            "Engine configuration"
        );
    }

    /// Builds the uninitialized engine lifecycle for the selected backend.
    pub fn lifecycle(&self) -> anyhow::Result<LifecycleManager> {
        match self.engine.engine_backend {
            EngineBackend::HuggingFace => EngineConfig::huggingface_lifecycle(&self.huggingface),
            #[cfg(feature = "mock")]
            EngineBackend::Mock => Ok(self.mock.clone().into_lifecycle()),
        }
    }

    fn log_build_info() {
        tracing::debug!(
            target: TRACING_TARGET_SERVER_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );
    }

    fn enabled_features() -> Vec<&'static str> {
        [
            cfg!(feature = "dotenv").then_some("dotenv"),
            cfg!(feature = "mock").then_some("mock"),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_defaults() -> anyhow::Result<()> {
        let cli = Cli::try_parse_from(["medlens"])?;
        assert_eq!(cli.server.port, 8000);
        assert_eq!(cli.engine.engine_backend, EngineBackend::HuggingFace);
        assert!(!cli.service.strict_length_bounds);
        assert_eq!(cli.middleware.openapi.open_api_json, "/api/openapi.json");
        Ok(())
    }

    #[test]
    fn parses_flags() -> anyhow::Result<()> {
        let cli = Cli::try_parse_from([
            "medlens",
            "--port",
            "9000",
            "--serve-degraded",
            "--strict-length-bounds",
            "--log-format",
            "json",
        ])?;
        assert_eq!(cli.server.port, 9000);
        assert!(cli.engine.serve_degraded);
        assert!(cli.service.strict_length_bounds);
        assert_eq!(cli.engine.log_format, LogFormat::Json);
        Ok(())
    }

    #[cfg(feature = "mock")]
    #[tokio::test]
    async fn mock_backend_loads_both_engines() -> anyhow::Result<()> {
        let cli = Cli::try_parse_from(["medlens", "--engine-backend", "mock"])?;
        let lifecycle = cli.lifecycle()?;
        lifecycle.initialize().await?;
        assert!(lifecycle.readiness().ner);
        assert!(lifecycle.readiness().summarizer);
        Ok(())
    }
}
