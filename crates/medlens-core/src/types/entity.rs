//! Recognized entity spans.

use serde::{Deserialize, Serialize};

/// One recognized span of the source text.
///
/// `start` and `end` are character offsets into the exact input string with
/// `start <= end`; `confidence` is rounded to two decimals and lies in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct Entity {
    /// Surface form of the span.
    pub text: String,
    /// Entity category assigned by the engine.
    pub label: String,
    /// Engine confidence for the merged span.
    pub confidence: f64,
    /// Character offset where the span starts.
    pub start: usize,
    /// Character offset where the span ends (exclusive).
    pub end: usize,
}
