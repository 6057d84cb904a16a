//! Result of the combined extract-and-summarize operation.

use serde::{Deserialize, Serialize};

use super::{Entity, SummaryResult};

/// Entities and summary computed over the same input text.
///
/// Only ever constructed from two successful service calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct CombinedResult {
    /// Entities ordered by ascending start offset.
    pub entities: Vec<Entity>,
    /// Summary of the same text.
    pub summary: SummaryResult,
}

impl CombinedResult {
    /// Pairs the two service results.
    pub fn new(entities: Vec<Entity>, summary: SummaryResult) -> Self {
        Self { entities, summary }
    }

    /// The text both services ran on.
    pub fn original_text(&self) -> &str {
        &self.summary.original_text
    }
}
