//! Engine-backed services.
//!
//! Each service wraps exactly one model handle, validates its input, calls
//! the engine and normalizes the raw output into the public data model.

mod extraction;
mod summarization;

pub use extraction::{ExtractionService, normalize_spans};
pub use summarization::SummarizationService;

use crate::{Error, Result};

/// Message returned for empty or whitespace-only input.
pub const EMPTY_TEXT_MESSAGE: &str = "Text input cannot be empty";

/// Rejects empty or whitespace-only text.
pub fn ensure_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(Error::invalid_input().with_message(EMPTY_TEXT_MESSAGE));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn blank_text_is_invalid_input() {
        for text in ["", " ", "\n\t  "] {
            let error = ensure_text(text).unwrap_err();
            assert_eq!(error.kind(), ErrorKind::InvalidInput);
            assert_eq!(error.message(), Some(EMPTY_TEXT_MESSAGE));
        }
        assert!(ensure_text(" x ").is_ok());
    }
}
