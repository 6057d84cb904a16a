//! Summarization request payload.

use medlens_core::types::{DEFAULT_MAX_LENGTH, DEFAULT_MIN_LENGTH, GenerationParams};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request payload for summarization.
///
/// Absent or `null` generation fields fall back to `max_length = 60`,
/// `min_length = 20` and `do_sample = false`.
#[must_use]
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, Validate)]
pub struct SummarizeRequest {
    /// Text to summarize.
    pub text: String,
    /// Upper bound on generated tokens.
    #[validate(range(min = 1))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    /// Lower bound on generated tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    /// Sample during decoding instead of decoding deterministically.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub do_sample: Option<bool>,
}

impl SummarizeRequest {
    /// Creates a request for `text` with every generation field defaulted.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Sets the token bounds.
    pub fn with_bounds(mut self, max_length: u32, min_length: u32) -> Self {
        self.max_length = Some(max_length);
        self.min_length = Some(min_length);
        self
    }

    /// Resolves the generation parameters, applying defaults.
    pub fn generation_params(&self) -> GenerationParams {
        GenerationParams::new(
            self.max_length.unwrap_or(DEFAULT_MAX_LENGTH),
            self.min_length.unwrap_or(DEFAULT_MIN_LENGTH),
        )
        .with_sample(self.do_sample.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_missing_and_null_fields() -> anyhow::Result<()> {
        let missing: SummarizeRequest = serde_json::from_str(r#"{"text":"a b c"}"#)?;
        let null: SummarizeRequest = serde_json::from_str(
            r#"{"text":"a b c","max_length":null,"min_length":null,"do_sample":null}"#,
        )?;

        for request in [missing, null] {
            assert_eq!(request.generation_params(), GenerationParams::default());
        }

        Ok(())
    }

    #[test]
    fn explicit_fields_are_kept() {
        let request = SummarizeRequest::new("a b c").with_bounds(10, 2);
        let params = request.generation_params();

        assert_eq!(params.max_length, 10);
        assert_eq!(params.min_length, 2);
        assert!(!params.sample);
    }

    #[test]
    fn zero_max_length_is_rejected() {
        let request = SummarizeRequest::new("a b c").with_bounds(0, 0);
        assert!(request.validate().is_err());

        let request = SummarizeRequest::new("a b c").with_bounds(1, 0);
        assert!(request.validate().is_ok());
    }
}
