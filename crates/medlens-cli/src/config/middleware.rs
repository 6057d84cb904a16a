//! Middleware configuration for the HTTP server.
//!
//! Re-uses the CORS and OpenAPI configs from `medlens-server`, so every
//! option is settable through CLI arguments or environment variables.

use clap::Args;
use medlens_server::middleware::{CorsConfig, OpenApiConfig};
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// Middleware configuration combining CORS and OpenAPI settings.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// CORS (Cross-Origin Resource Sharing) configuration.
    #[clap(flatten)]
    pub cors: CorsConfig,

    /// Paths of the OpenAPI document and the Scalar UI.
    #[clap(flatten)]
    pub openapi: OpenApiConfig,
}

impl MiddlewareConfig {
    /// Logs middleware configuration at info level.
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            origins = ?self.cors.allowed_origins,
            credentials = self.cors.allow_credentials,
            max_age_secs = self.cors.max_age_seconds,
            "CORS configuration"
        );

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            openapi_path = %self.openapi.open_api_json,
            scalar_path = %self.openapi.scalar_ui,
            "OpenAPI configuration"
        );
    }
}
