//! Liveness and readiness handlers.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use medlens_core::Orchestrator;

use crate::extract::Json;
use crate::handler::Result;
use crate::handler::response::{Health, ServiceInfo};
use crate::service::ServiceState;

/// Tracing target for monitor operations.
const TRACING_TARGET: &str = "medlens_server::handler::monitors";

/// Reports that the service is up, with the configured model identifiers.
#[tracing::instrument(skip_all)]
async fn service_info(
    State(orchestrator): State<Orchestrator>,
) -> Result<(StatusCode, Json<ServiceInfo>)> {
    let response = ServiceInfo::new(orchestrator.model_names());
    Ok((StatusCode::OK, Json(response)))
}

fn service_info_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Service info")
        .description("Liveness check. Answers even while models are still loading.")
        .response::<200, Json<ServiceInfo>>()
}

/// Reports engine readiness.
#[tracing::instrument(skip_all)]
async fn health_status(
    State(orchestrator): State<Orchestrator>,
) -> Result<(StatusCode, Json<Health>)> {
    let response = Health::from(orchestrator.readiness());

    tracing::debug!(
        target: TRACING_TARGET,
        status = response.status.as_ref(),
        ner = response.models_loaded.ner,
        summarizer = response.models_loaded.summarizer,
        "Health status checked",
    );

    Ok((StatusCode::OK, Json(response)))
}

fn health_status_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Health status")
        .description(
            "Reports `healthy` when both models are loaded and `degraded` otherwise, \
             together with per-model readiness.",
        )
        .response::<200, Json<Health>>()
}

/// Returns routes for liveness and health monitoring.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/", get_with(service_info, service_info_docs))
        .api_route("/health", get_with(health_status, health_status_docs))
        .with_path_items(|item| item.tag("Monitors"))
}

#[cfg(test)]
mod tests {
    use crate::handler::response::{Health, HealthStatus, ServiceInfo};
    use crate::handler::test::{create_test_server, create_uninitialized_server};

    #[tokio::test]
    async fn service_info_lists_models() -> anyhow::Result<()> {
        let server = create_uninitialized_server().await?;

        let response = server.get("/").await;
        response.assert_status_ok();

        let body = response.json::<ServiceInfo>();
        assert_eq!(body.message, ServiceInfo::MESSAGE);
        assert_eq!(body.status, "active");
        assert_eq!(body.models.ner, "mock/biomedical-ner");
        assert_eq!(body.models.summarization, "mock/summarizer");

        Ok(())
    }

    #[tokio::test]
    async fn health_reflects_readiness() -> anyhow::Result<()> {
        let server = create_uninitialized_server().await?;
        let body = server.get("/health").await.json::<Health>();
        assert_eq!(body.status, HealthStatus::Degraded);
        assert!(!body.models_loaded.ner);
        assert!(!body.models_loaded.summarizer);

        let server = create_test_server().await?;
        let body = server.get("/health").await.json::<Health>();
        assert_eq!(body.status, HealthStatus::Healthy);
        assert!(body.models_loaded.ner);
        assert!(body.models_loaded.summarizer);

        Ok(())
    }
}
