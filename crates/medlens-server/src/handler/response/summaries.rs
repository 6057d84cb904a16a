//! Summarization response types.

use medlens_core::types::SummaryResult;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Response of `POST /summarize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Summary {
    /// The text as submitted.
    pub original_text: String,
    /// Generated summary.
    pub summary: String,
    /// Word count of the original text.
    pub original_length: usize,
    /// Word count of the summary.
    pub summary_length: usize,
    /// `summary_length / original_length`, rounded to two decimals.
    pub compression_ratio: f64,
    /// Token upper bound that was used.
    pub max_length: u32,
    /// Token lower bound that was used.
    pub min_length: u32,
}

impl From<SummaryResult> for Summary {
    fn from(result: SummaryResult) -> Self {
        Self {
            original_text: result.original_text,
            summary: result.summary_text,
            original_length: result.original_word_count,
            summary_length: result.summary_word_count,
            compression_ratio: result.compression_ratio,
            max_length: result.max_length,
            min_length: result.min_length,
        }
    }
}

/// Response of `POST /summarize-simple`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SimpleSummary {
    /// The text as submitted.
    pub original_text: String,
    /// Generated summary.
    pub summary: String,
    /// `summary_length / original_length`, rounded to two decimals.
    pub compression_ratio: f64,
}

impl From<SummaryResult> for SimpleSummary {
    fn from(result: SummaryResult) -> Self {
        Self {
            original_text: result.original_text,
            summary: result.summary_text,
            compression_ratio: result.compression_ratio,
        }
    }
}
