//! Plain text request payload.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Request payload carrying a single text to analyze.
///
/// Emptiness is checked by the orchestrator, so that every endpoint answers
/// an empty or whitespace-only text with the same message.
#[must_use]
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct TextInput {
    /// Clinical or biomedical text.
    pub text: String,
}

impl TextInput {
    /// Creates a new request for `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}
