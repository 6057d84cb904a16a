//! Biomedical named entity recognition handlers.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use medlens_core::Orchestrator;

use crate::extract::Json;
use crate::handler::Result;
use crate::handler::request::TextInput;
use crate::handler::response::{AnalyzedText, ErrorResponse, ExtractedEntities};
use crate::service::ServiceState;

/// Tracing target for entity extraction operations.
const TRACING_TARGET: &str = "medlens_server::handler::entities";

/// Extracts biomedical entities from the submitted text.
#[tracing::instrument(skip_all, fields(text_len = request.text.len()))]
async fn extract_entities(
    State(orchestrator): State<Orchestrator>,
    Json(request): Json<TextInput>,
) -> Result<(StatusCode, Json<ExtractedEntities>)> {
    tracing::debug!(target: TRACING_TARGET, "Extracting entities");

    let entities = orchestrator.extract_entities(&request.text).await?;
    let response = ExtractedEntities::new(request.text, entities);

    tracing::info!(
        target: TRACING_TARGET,
        total_entities = response.total_entities,
        "Entities extracted",
    );

    Ok((StatusCode::OK, Json(response)))
}

fn extract_entities_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Extract entities")
        .description(
            "Recognizes diseases, symptoms, medications and other biomedical entities. \
             Entities are ordered by their start offset.",
        )
        .response::<200, Json<ExtractedEntities>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<500, Json<ErrorResponse>>()
        .response::<503, Json<ErrorResponse>>()
}

/// Same as [`extract_entities`] with a compact response shape.
#[tracing::instrument(skip_all, fields(text_len = request.text.len()))]
async fn analyze(
    State(orchestrator): State<Orchestrator>,
    Json(request): Json<TextInput>,
) -> Result<(StatusCode, Json<AnalyzedText>)> {
    tracing::debug!(target: TRACING_TARGET, "Analyzing text");

    let entities = orchestrator.extract_entities(&request.text).await?;
    let response = AnalyzedText::new(request.text, entities);

    tracing::info!(
        target: TRACING_TARGET,
        count = response.count,
        "Text analyzed",
    );

    Ok((StatusCode::OK, Json(response)))
}

fn analyze_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Analyze text")
        .description("Extracts entities and returns them with their count.")
        .response::<200, Json<AnalyzedText>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<500, Json<ErrorResponse>>()
        .response::<503, Json<ErrorResponse>>()
}

/// Returns routes for entity extraction.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/extract-entities",
            post_with(extract_entities, extract_entities_docs),
        )
        .api_route("/analyze", post_with(analyze, analyze_docs))
        .with_path_items(|item| item.tag("Entities"))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::handler::request::TextInput;
    use crate::handler::response::{AnalyzedText, ErrorResponse, ExtractedEntities};
    use crate::handler::test::{DIABETES_TEXT, create_test_server, create_uninitialized_server};

    #[tokio::test]
    async fn extract_entities_orders_spans() -> anyhow::Result<()> {
        let server = create_test_server().await?;

        let response = server
            .post("/extract-entities")
            .json(&TextInput::new(DIABETES_TEXT))
            .await;
        response.assert_status_ok();

        let body = response.json::<ExtractedEntities>();
        assert_eq!(body.input_text, DIABETES_TEXT);
        assert_eq!(body.total_entities, body.entities.len());
        assert!(body.total_entities > 0);

        let words: Vec<&str> = body.entities.iter().map(|e| e.word.as_str()).collect();
        assert!(words.contains(&"diabetes"));
        assert!(words.contains(&"Alzheimer's disease"));

        for disease in ["diabetes", "Alzheimer's disease"] {
            let entity = body
                .entities
                .iter()
                .find(|e| e.word == disease)
                .ok_or_else(|| anyhow::anyhow!("missing entity {disease}"))?;
            assert!(entity.entity_group.starts_with("Disease"));
            assert!((0.0..=1.0).contains(&entity.score));
        }

        for pair in body.entities.windows(2) {
            assert!(pair[0].start <= pair[1].start);
        }
        for entity in &body.entities {
            assert!(entity.start <= entity.end);
            assert!((0.0..=1.0).contains(&entity.score));
            assert_eq!(entity.score, (entity.score * 100.0).round_ties_even() / 100.0);
        }

        Ok(())
    }

    #[tokio::test]
    async fn analyze_matches_extract_entities() -> anyhow::Result<()> {
        let server = create_test_server().await?;

        let extracted = server
            .post("/extract-entities")
            .json(&TextInput::new(DIABETES_TEXT))
            .await
            .json::<ExtractedEntities>();
        let analyzed = server
            .post("/analyze")
            .json(&TextInput::new(DIABETES_TEXT))
            .await
            .json::<AnalyzedText>();

        assert_eq!(analyzed.text, DIABETES_TEXT);
        assert_eq!(analyzed.count, extracted.total_entities);
        assert_eq!(analyzed.entities, extracted.entities);

        Ok(())
    }

    #[tokio::test]
    async fn text_without_entities_returns_empty_list() -> anyhow::Result<()> {
        let server = create_test_server().await?;

        let response = server
            .post("/extract-entities")
            .json(&TextInput::new("The weather was pleasant today."))
            .await;
        response.assert_status_ok();

        let body = response.json::<ExtractedEntities>();
        assert_eq!(body.total_entities, 0);
        assert!(body.entities.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn whitespace_text_is_rejected() -> anyhow::Result<()> {
        let server = create_test_server().await?;

        for path in ["/extract-entities", "/analyze"] {
            let response = server.post(path).json(&TextInput::new("  \n\t ")).await;
            response.assert_status(StatusCode::BAD_REQUEST);

            let body = response.json::<serde_json::Value>();
            assert_eq!(body["name"], "bad_request");
            assert_eq!(body["message"], "Text input cannot be empty");
        }

        Ok(())
    }

    #[tokio::test]
    async fn unloaded_model_returns_503() -> anyhow::Result<()> {
        let server = create_uninitialized_server().await?;

        let response = server
            .post("/extract-entities")
            .json(&TextInput::new(DIABETES_TEXT))
            .await;
        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

        let body = response.json::<serde_json::Value>();
        assert_eq!(body["name"], ErrorResponse::SERVICE_UNAVAILABLE.name.as_ref());
        assert_eq!(body["message"], "NER model not loaded");

        Ok(())
    }

    #[tokio::test]
    async fn malformed_body_is_rejected() -> anyhow::Result<()> {
        let server = create_test_server().await?;

        let response = server
            .post("/extract-entities")
            .json(&serde_json::json!({ "content": DIABETES_TEXT }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        Ok(())
    }
}
