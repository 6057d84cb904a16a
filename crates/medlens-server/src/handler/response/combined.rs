use medlens_core::types::CombinedResult;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::entities::{EntitySpan, entity_spans};

/// Response of `POST /extract-and-summarize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Analysis {
    /// The text as submitted.
    pub original_text: String,
    /// Generated summary.
    pub summary: String,
    /// Entities ordered by start offset.
    pub entities: Vec<EntitySpan>,
    /// Number of entities.
    pub total_entities: usize,
    /// `summary_length / original_length`, rounded to two decimals.
    pub compression_ratio: f64,
    /// Word count of the original text.
    pub original_length: usize,
    /// Word count of the summary.
    pub summary_length: usize,
}

impl From<CombinedResult> for Analysis {
    fn from(result: CombinedResult) -> Self {
        let CombinedResult { entities, summary } = result;
        let entities = entity_spans(entities);

        Self {
            original_text: summary.original_text,
            summary: summary.summary_text,
            total_entities: entities.len(),
            entities,
            compression_ratio: summary.compression_ratio,
            original_length: summary.original_word_count,
            summary_length: summary.summary_word_count,
        }
    }
}
