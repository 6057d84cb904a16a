use std::sync::Arc;

use super::ensure_text;
use crate::engine::TextGenerator;
use crate::lifecycle::ModelHandle;
use crate::types::{GenerationParams, SummaryResult};
use crate::{Error, Result};

/// Tracing target for summarization.
pub const TRACING_TARGET: &str = "medlens_core::service::summarization";

/// Abstractive summarization over the generation engine.
#[derive(Debug, Clone)]
pub struct SummarizationService {
    handle: Arc<ModelHandle<dyn TextGenerator>>,
}

impl SummarizationService {
    /// Binds the service to a summarizer handle.
    pub fn new(handle: Arc<ModelHandle<dyn TextGenerator>>) -> Self {
        Self { handle }
    }

    /// Whether the underlying engine is loaded.
    pub fn is_ready(&self) -> bool {
        self.handle.is_ready()
    }

    /// Summarizes `text`, forwarding `params` to the engine unchanged.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` when `text` is empty or whitespace.
    /// - `ModelUnavailable` when the summarizer is not loaded.
    /// - `Inference` when the engine fails.
    pub async fn summarize(&self, text: &str, params: &GenerationParams) -> Result<SummaryResult> {
        ensure_text(text)?;

        let summary = {
            let engine = self.handle.acquire().await?;
            engine
                .generate(text, params)
                .await
                .map_err(Error::into_inference)?
        };

        let result = SummaryResult::new(text, summary, params)?;
        tracing::debug!(
            target: TRACING_TARGET,
            original_words = result.original_word_count,
            summary_words = result.summary_word_count,
            compression_ratio = result.compression_ratio,
            "Summary generated",
        );

        Ok(result)
    }
}
