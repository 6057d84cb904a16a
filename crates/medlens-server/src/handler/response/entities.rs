//! Entity extraction response types.

use medlens_core::types::Entity;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A recognized biomedical entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EntitySpan {
    /// Surface text of the span.
    pub word: String,
    /// Semantic category, e.g. `Disease_disorder`.
    pub entity_group: String,
    /// Confidence in `[0, 1]`, rounded to two decimals.
    pub score: f64,
    /// Character offset where the span begins.
    pub start: usize,
    /// Character offset where the span ends (exclusive).
    pub end: usize,
}

impl From<Entity> for EntitySpan {
    fn from(entity: Entity) -> Self {
        Self {
            word: entity.text,
            entity_group: entity.label,
            score: entity.confidence,
            start: entity.start,
            end: entity.end,
        }
    }
}

/// Converts core entities into wire spans, keeping their order.
pub(crate) fn entity_spans(entities: Vec<Entity>) -> Vec<EntitySpan> {
    entities.into_iter().map(EntitySpan::from).collect()
}

/// Response of `POST /extract-entities`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExtractedEntities {
    /// The text as submitted.
    pub input_text: String,
    /// Entities ordered by start offset.
    pub entities: Vec<EntitySpan>,
    /// Number of entities.
    pub total_entities: usize,
}

impl ExtractedEntities {
    /// Builds the response for `input_text`.
    pub fn new(input_text: String, entities: Vec<Entity>) -> Self {
        let entities = entity_spans(entities);
        Self {
            input_text,
            total_entities: entities.len(),
            entities,
        }
    }
}

/// Response of `POST /analyze`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalyzedText {
    /// The text as submitted.
    pub text: String,
    /// Entities ordered by start offset.
    pub entities: Vec<EntitySpan>,
    /// Number of entities.
    pub count: usize,
}

impl AnalyzedText {
    /// Builds the response for `text`.
    pub fn new(text: String, entities: Vec<Entity>) -> Self {
        let entities = entity_spans(entities);
        Self {
            text,
            count: entities.len(),
            entities,
        }
    }
}
