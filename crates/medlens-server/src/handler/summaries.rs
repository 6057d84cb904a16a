//! Abstractive summarization handlers.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use medlens_core::Orchestrator;
use medlens_core::types::GenerationParams;

use crate::extract::{Json, ValidateJson};
use crate::handler::Result;
use crate::handler::request::{SummarizeRequest, TextInput};
use crate::handler::response::{ErrorResponse, SimpleSummary, Summary};
use crate::service::ServiceState;

/// Tracing target for summarization operations.
const TRACING_TARGET: &str = "medlens_server::handler::summaries";

/// Summarizes the submitted text.
#[tracing::instrument(
    skip_all,
    fields(
        text_len = request.text.len(),
        max_length = ?request.max_length,
        min_length = ?request.min_length,
    )
)]
async fn summarize(
    State(orchestrator): State<Orchestrator>,
    ValidateJson(request): ValidateJson<SummarizeRequest>,
) -> Result<(StatusCode, Json<Summary>)> {
    tracing::debug!(target: TRACING_TARGET, "Summarizing text");

    let params = request.generation_params();
    let result = orchestrator.summarize(&request.text, params).await?;

    tracing::info!(
        target: TRACING_TARGET,
        original_length = result.original_word_count,
        summary_length = result.summary_word_count,
        compression_ratio = result.compression_ratio,
        "Text summarized",
    );

    Ok((StatusCode::OK, Json(result.into())))
}

fn summarize_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Summarize text")
        .description(
            "Generates an abstractive summary. `max_length` and `min_length` bound the \
             generated tokens and default to 60 and 20; `do_sample` defaults to false, \
             which makes the output deterministic.",
        )
        .response::<200, Json<Summary>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<500, Json<ErrorResponse>>()
        .response::<503, Json<ErrorResponse>>()
}

/// Summarizes with default generation parameters.
#[tracing::instrument(skip_all, fields(text_len = request.text.len()))]
async fn summarize_simple(
    State(orchestrator): State<Orchestrator>,
    Json(request): Json<TextInput>,
) -> Result<(StatusCode, Json<SimpleSummary>)> {
    tracing::debug!(target: TRACING_TARGET, "Summarizing text with defaults");

    let result = orchestrator
        .summarize(&request.text, GenerationParams::default())
        .await?;

    Ok((StatusCode::OK, Json(result.into())))
}

fn summarize_simple_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Summarize text (defaults)")
        .description("Summarizes with `max_length = 60`, `min_length = 20` and no sampling.")
        .response::<200, Json<SimpleSummary>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<500, Json<ErrorResponse>>()
        .response::<503, Json<ErrorResponse>>()
}

/// Returns routes for summarization.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/summarize", post_with(summarize, summarize_docs))
        .api_route(
            "/summarize-simple",
            post_with(summarize_simple, summarize_simple_docs),
        )
        .with_path_items(|item| item.tag("Summaries"))
}
