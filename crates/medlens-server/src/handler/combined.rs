//! Combined entity extraction and summarization handler.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use medlens_core::Orchestrator;

use crate::extract::{Json, ValidateJson};
use crate::handler::Result;
use crate::handler::request::SummarizeRequest;
use crate::handler::response::{Analysis, ErrorResponse};
use crate::service::ServiceState;

/// Tracing target for combined operations.
const TRACING_TARGET: &str = "medlens_server::handler::combined";

/// Extracts entities from and summarizes the same text.
#[tracing::instrument(skip_all, fields(text_len = request.text.len()))]
async fn extract_and_summarize(
    State(orchestrator): State<Orchestrator>,
    ValidateJson(request): ValidateJson<SummarizeRequest>,
) -> Result<(StatusCode, Json<Analysis>)> {
    tracing::debug!(target: TRACING_TARGET, "Extracting entities and summarizing");

    let params = request.generation_params();
    let result = orchestrator
        .extract_and_summarize(&request.text, params)
        .await?;
    let response = Analysis::from(result);

    tracing::info!(
        target: TRACING_TARGET,
        total_entities = response.total_entities,
        compression_ratio = response.compression_ratio,
        "Text extracted and summarized",
    );

    Ok((StatusCode::OK, Json(response)))
}

fn extract_and_summarize_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Extract entities and summarize")
        .description(
            "Runs entity extraction and summarization concurrently over the same text. \
             Fails as a whole if either operation fails.",
        )
        .response::<200, Json<Analysis>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<500, Json<ErrorResponse>>()
        .response::<503, Json<ErrorResponse>>()
}

/// Returns routes for the combined operation.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/extract-and-summarize",
            post_with(extract_and_summarize, extract_and_summarize_docs),
        )
        .with_path_items(|item| item.tag("Analysis"))
}
