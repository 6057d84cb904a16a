//! Security middleware: CORS, body size limits and response headers.

use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::Method;
use axum::http::header::{self, HeaderValue};
#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use super::MAX_BODY_SIZE;

/// Origins allowed when none are configured.
const DEVELOPMENT_ORIGINS: [&str; 4] = [
    "http://localhost:3000",
    "http://localhost:8080",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:8080",
];

/// Extension trait for `axum::`[`Router`] to apply security middleware.
pub trait RouterSecurityExt<S> {
    /// Layers CORS rules, the request body limit and `nosniff` headers.
    fn with_security(self, cors: &CorsConfig) -> Self;
}

impl<S> RouterSecurityExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_security(self, cors: &CorsConfig) -> Self {
        let cors_layer = CorsLayer::new()
            .allow_origin(cors.to_header_values())
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
            .allow_credentials(cors.allow_credentials)
            .max_age(cors.max_age());

        self.layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
            .layer(cors_layer)
            .layer(SetResponseHeaderLayer::overriding(
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ))
    }
}

/// CORS (Cross-Origin Resource Sharing) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct CorsConfig {
    /// List of allowed CORS origins.
    ///
    /// If empty, defaults to localhost origins for development.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "CORS_ORIGINS", value_delimiter = ',')
    )]
    pub allowed_origins: Vec<String>,

    /// Maximum age for CORS preflight requests in seconds.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "CORS_MAX_AGE", default_value = "3600")
    )]
    pub max_age_seconds: u64,

    /// Whether to allow credentials in CORS requests.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "CORS_ALLOW_CREDENTIALS", default_value = "false")
    )]
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            max_age_seconds: 3600,
            allow_credentials: false,
        }
    }
}

impl CorsConfig {
    /// Returns the CORS max age as a Duration.
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_seconds)
    }

    /// Converts configured origins to header values, falling back to localhost.
    ///
    /// Origins that are not valid header values are skipped.
    pub fn to_header_values(&self) -> Vec<HeaderValue> {
        if self.allowed_origins.is_empty() {
            return DEVELOPMENT_ORIGINS
                .into_iter()
                .map(HeaderValue::from_static)
                .collect();
        }

        self.allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use axum::routing::post;
    use axum_test::TestServer;

    use super::*;

    #[test]
    fn empty_origins_fall_back_to_localhost() {
        let origins = CorsConfig::default().to_header_values();
        assert_eq!(origins.len(), DEVELOPMENT_ORIGINS.len());
        assert_eq!(origins[0], "http://localhost:3000");
    }

    #[test]
    fn invalid_origins_are_skipped() {
        let config = CorsConfig {
            allowed_origins: vec!["https://medlens.dev".to_owned(), "bad\norigin".to_owned()],
            ..CorsConfig::default()
        };

        assert_eq!(config.to_header_values(), vec!["https://medlens.dev"]);
    }

    #[tokio::test]
    async fn oversized_bodies_are_rejected() -> anyhow::Result<()> {
        let app: Router = Router::new()
            .route("/", post(|body: String| async move { body.len().to_string() }))
            .with_security(&CorsConfig::default());
        let server = TestServer::new(app)?;

        let response = server.post("/").text("x".repeat(MAX_BODY_SIZE + 1)).await;
        response.assert_status(axum::http::StatusCode::PAYLOAD_TOO_LARGE);

        let response = server.post("/").text("small").await;
        response.assert_status_ok();
        assert_eq!(
            response.headers().get(header::X_CONTENT_TYPE_OPTIONS),
            Some(&HeaderValue::from_static("nosniff"))
        );

        Ok(())
    }
}
