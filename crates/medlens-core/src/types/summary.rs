//! Summarization parameters and results.

use serde::{Deserialize, Serialize};

use super::{round2, word_count};
use crate::{Error, Result};

/// Default upper bound on generated tokens.
pub const DEFAULT_MAX_LENGTH: u32 = 60;

/// Default lower bound on generated tokens.
pub const DEFAULT_MIN_LENGTH: u32 = 20;

/// Generation bounds and decoding mode forwarded to the text generator.
///
/// `max_length` and `min_length` bound the number of generated tokens, not
/// words. No relationship between them is enforced here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct GenerationParams {
    /// Maximum number of generated tokens.
    pub max_length: u32,
    /// Minimum number of generated tokens.
    pub min_length: u32,
    /// Sample during decoding; `false` requires deterministic decoding.
    pub sample: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            min_length: DEFAULT_MIN_LENGTH,
            sample: false,
        }
    }
}

impl GenerationParams {
    /// Creates deterministic parameters with the given bounds.
    pub fn new(max_length: u32, min_length: u32) -> Self {
        Self {
            max_length,
            min_length,
            sample: false,
        }
    }

    /// Enables or disables sampling.
    pub fn with_sample(mut self, sample: bool) -> Self {
        self.sample = sample;
        self
    }

    /// Returns true when `min_length <= max_length`.
    pub fn has_consistent_bounds(&self) -> bool {
        self.min_length <= self.max_length
    }
}

/// Normalized output of one summarization call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct SummaryResult {
    /// The text that was summarized, unchanged.
    pub original_text: String,
    /// The generated summary.
    pub summary_text: String,
    /// Whitespace word count of the original text.
    pub original_word_count: usize,
    /// Whitespace word count of the summary.
    pub summary_word_count: usize,
    /// `summary_word_count / original_word_count`, rounded to two decimals.
    pub compression_ratio: f64,
    /// Upper generation bound the summary was produced with.
    pub max_length: u32,
    /// Lower generation bound the summary was produced with.
    pub min_length: u32,
}

impl SummaryResult {
    /// Assembles a result and computes the derived word metrics.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidInput`] when the original text has no
    /// words, since the compression ratio is undefined.
    ///
    /// [`ErrorKind::InvalidInput`]: crate::ErrorKind::InvalidInput
    pub fn new(
        original_text: impl Into<String>,
        summary_text: impl Into<String>,
        params: &GenerationParams,
    ) -> Result<Self> {
        let original_text = original_text.into();
        let summary_text = summary_text.into();

        let original_word_count = word_count(&original_text);
        if original_word_count == 0 {
            return Err(Error::invalid_input()
                .with_message("Cannot compute compression ratio for text without words"));
        }

        let summary_word_count = word_count(&summary_text);
        let compression_ratio = round2(summary_word_count as f64 / original_word_count as f64);

        Ok(Self {
            original_text,
            summary_text,
            original_word_count,
            summary_word_count,
            compression_ratio,
            max_length: params.max_length,
            min_length: params.min_length,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn defaults_match_public_contract() {
        let params = GenerationParams::default();
        assert_eq!(params.max_length, 60);
        assert_eq!(params.min_length, 20);
        assert!(!params.sample);
        assert!(params.has_consistent_bounds());
        assert!(!GenerationParams::new(10, 20).has_consistent_bounds());
    }

    #[test]
    fn compression_ratio_is_rounded_word_ratio() -> Result<()> {
        let params = GenerationParams::default();
        let result = SummaryResult::new("one two three", "one", &params)?;

        assert_eq!(result.original_word_count, 3);
        assert_eq!(result.summary_word_count, 1);
        assert_eq!(result.compression_ratio, 0.33);
        assert_eq!(result.max_length, 60);
        assert_eq!(result.min_length, 20);
        Ok(())
    }

    #[test]
    fn compression_ratio_ties_round_to_even() -> Result<()> {
        let params = GenerationParams::default();
        let original = "a b c d e f g h";

        let one_eighth = SummaryResult::new(original, "a", &params)?;
        assert_eq!(one_eighth.compression_ratio, 0.12);

        let five_eighths = SummaryResult::new(original, "a b c d e", &params)?;
        assert_eq!(five_eighths.compression_ratio, 0.62);
        Ok(())
    }

    #[test]
    fn zero_word_original_is_rejected() {
        let params = GenerationParams::default();
        let error = SummaryResult::new(" \n\t ", "summary", &params).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidInput);
    }
}
