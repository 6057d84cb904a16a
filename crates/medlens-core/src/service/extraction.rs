use std::sync::Arc;

use super::ensure_text;
use crate::engine::{AggregationStrategy, TokenClassifier, TokenSpan};
use crate::lifecycle::ModelHandle;
use crate::types::{Entity, char_slice, round2};
use crate::{Error, Result};

/// Tracing target for entity extraction.
pub const TRACING_TARGET: &str = "medlens_core::service::extraction";

/// Named-entity extraction over the NER engine.
///
/// Stateless apart from the shared handle; cheap to clone.
#[derive(Debug, Clone)]
pub struct ExtractionService {
    handle: Arc<ModelHandle<dyn TokenClassifier>>,
}

impl ExtractionService {
    /// Binds the service to a NER handle.
    pub fn new(handle: Arc<ModelHandle<dyn TokenClassifier>>) -> Self {
        Self { handle }
    }

    /// Whether the underlying engine is loaded.
    pub fn is_ready(&self) -> bool {
        self.handle.is_ready()
    }

    /// Extracts entities from `text`, ordered by start offset.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` when `text` is empty or whitespace.
    /// - `ModelUnavailable` when the NER engine is not loaded.
    /// - `Inference` when the engine fails.
    pub async fn extract(&self, text: &str) -> Result<Vec<Entity>> {
        ensure_text(text)?;

        let spans = {
            let engine = self.handle.acquire().await?;
            engine
                .classify(text, AggregationStrategy::Simple)
                .await
                .map_err(Error::into_inference)?
        };

        let entities = normalize_spans(text, spans);
        tracing::debug!(
            target: TRACING_TARGET,
            entity_count = entities.len(),
            "Entities extracted",
        );

        Ok(entities)
    }
}

/// Converts engine spans into public entities.
///
/// Drops reversed spans, takes the surface form from the source text when the
/// offsets fit, clamps and rounds confidences, and orders by start offset.
pub fn normalize_spans(text: &str, spans: Vec<TokenSpan>) -> Vec<Entity> {
    let mut entities: Vec<Entity> = spans
        .into_iter()
        .filter_map(|span| {
            if span.start > span.end {
                tracing::warn!(
                    target: TRACING_TARGET,
                    label = %span.label,
                    start = span.start,
                    end = span.end,
                    "Dropping span with reversed offsets",
                );
                return None;
            }

            let surface = char_slice(text, span.start, span.end)
                .map(str::to_owned)
                .unwrap_or(span.word);
            let confidence = if span.score.is_nan() {
                0.0
            } else {
                round2(span.score.clamp(0.0, 1.0))
            };

            Some(Entity {
                text: surface,
                label: span.label,
                confidence,
                start: span.start,
                end: span.end,
            })
        })
        .collect();

    entities.sort_by_key(|entity| entity.start);
    entities
}
