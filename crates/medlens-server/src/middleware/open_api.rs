//! OpenAPI specification served with a Scalar UI.

use aide::axum::ApiRouter;
use aide::openapi::{Contact, Info, License, OpenApi, Tag};
use aide::scalar::Scalar;
use axum::routing::{Router, get};
use axum::{Extension, Json};
#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

/// Paths where the OpenAPI document and Scalar UI are served.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct OpenApiConfig {
    /// Path which exposes the OpenAPI JSON specification.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "OPENAPI_JSON_PATH", default_value = "/api/openapi.json")
    )]
    pub open_api_json: String,

    /// Path which exposes the Scalar API reference UI.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "OPENAPI_SCALAR_PATH", default_value = "/api/scalar")
    )]
    pub scalar_ui: String,
}

impl Default for OpenApiConfig {
    fn default() -> Self {
        Self {
            open_api_json: "/api/openapi.json".to_owned(),
            scalar_ui: "/api/scalar".to_owned(),
        }
    }
}

/// Extension trait for [`ApiRouter`] to finish it into a documented [`Router`].
pub trait RouterOpenApiExt<S> {
    /// Generates the OpenAPI document and serves it alongside the Scalar UI.
    fn with_open_api(self, config: &OpenApiConfig) -> Router<S>;
}

impl<S> RouterOpenApiExt<S> for ApiRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_open_api(self, config: &OpenApiConfig) -> Router<S> {
        async fn serve_openapi(Extension(api): Extension<OpenApi>) -> Json<OpenApi> {
            Json(api)
        }

        let mut api = OpenApi {
            info: api_info(),
            tags: api_tags(),
            ..OpenApi::default()
        };

        let scalar = Scalar::new(&config.open_api_json);
        let router = self
            .route(&config.scalar_ui, scalar.axum_route())
            .route(&config.open_api_json, get(serve_openapi));

        router.finish_api(&mut api).layer(Extension(api))
    }
}

fn api_info() -> Info {
    Info {
        title: "medlens API".to_owned(),
        summary: Some("Biomedical named entity recognition and summarization".to_owned()),
        description: Some(
            "Extracts diseases, symptoms, medications and other biomedical entities from \
             clinical text and produces abstractive summaries of it."
                .to_owned(),
        ),
        contact: Some(Contact {
            name: Some("medlens".to_owned()),
            url: Some("https://github.com/medlens/medlens".to_owned()),
            ..Contact::default()
        }),
        license: Some(License {
            name: "MIT".to_owned(),
            identifier: Some("MIT".to_owned()),
            ..License::default()
        }),
        version: env!("CARGO_PKG_VERSION").to_owned(),
        ..Info::default()
    }
}

fn api_tags() -> Vec<Tag> {
    let tag = |name: &str, description: &str| Tag {
        name: name.to_owned(),
        description: Some(description.to_owned()),
        ..Tag::default()
    };

    vec![
        tag("Monitors", "Liveness and model readiness"),
        tag("Entities", "Biomedical named entity recognition"),
        tag("Summaries", "Abstractive summarization"),
        tag("Analysis", "Entity extraction and summarization in one call"),
    ]
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum_test::TestServer;
    use medlens_core::mock::MockConfig;

    use super::*;
    use crate::handler::routes;
    use crate::service::{ServiceConfig, ServiceState};

    #[tokio::test]
    async fn document_lists_every_operation() -> anyhow::Result<()> {
        let lifecycle = Arc::new(MockConfig::default().into_lifecycle());
        let state = ServiceState::from_config(&ServiceConfig::default(), lifecycle);
        let config = OpenApiConfig::default();

        let app = routes().with_open_api(&config).with_state(state);
        let server = TestServer::new(app)?;

        let response = server.get(&config.open_api_json).await;
        response.assert_status_ok();

        let document = response.json::<serde_json::Value>();
        assert_eq!(document["info"]["title"], "medlens API");

        let paths = document["paths"]
            .as_object()
            .map(|paths| paths.keys().cloned().collect::<Vec<_>>())
            .unwrap_or_default();
        for path in [
            "/",
            "/health",
            "/extract-entities",
            "/analyze",
            "/summarize",
            "/summarize-simple",
            "/extract-and-summarize",
        ] {
            assert!(paths.iter().any(|p| p == path), "missing {path}");
        }

        server.get(&config.scalar_ui).await.assert_status_ok();

        Ok(())
    }
}
