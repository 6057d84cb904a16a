//! Capability traits for the two inference engines.
//!
//! The engines themselves are black boxes: a token classifier that labels
//! spans of text and a text generator that produces a summary. Backends
//! (remote APIs, local runtimes, mocks) implement these traits and are
//! constructed by an [`EngineLoader`] during lifecycle initialization.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, IntoStaticStr};

use crate::Result;
use crate::types::GenerationParams;

pub mod aggregation;

/// Tracing target for engine operations.
pub const TRACING_TARGET: &str = "medlens_core::engine";

/// Shared engine behaviour.
pub trait Engine: Send + Sync {
    /// Whether the engine tolerates concurrent calls.
    ///
    /// Non-reentrant engines are serialized behind a per-handle gate.
    fn is_reentrant(&self) -> bool {
        true
    }
}

/// Policy for merging adjacent same-label token predictions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(AsRefStr, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AggregationStrategy {
    /// Return raw token-level predictions, BIO prefixes included.
    None,
    /// Merge contiguous tokens of the same entity type into one span.
    #[default]
    Simple,
}

/// A labelled span as reported by a token-classification engine.
///
/// Offsets are character offsets into the classified text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenSpan {
    /// Surface form as reported by the engine.
    pub word: String,
    /// Entity label, with a `B-`/`I-` prefix for token-level output.
    pub label: String,
    /// Engine confidence.
    pub score: f64,
    /// Start character offset.
    pub start: usize,
    /// End character offset (exclusive).
    pub end: usize,
}

impl TokenSpan {
    /// Creates a new span.
    pub fn new(
        word: impl Into<String>,
        label: impl Into<String>,
        score: f64,
        start: usize,
        end: usize,
    ) -> Self {
        Self {
            word: word.into(),
            label: label.into(),
            score,
            start,
            end,
        }
    }
}

/// Token-classification engine used for named-entity recognition.
#[async_trait::async_trait]
pub trait TokenClassifier: Engine {
    /// Labels the spans of `text`, merging tokens per `aggregation`.
    async fn classify(
        &self,
        text: &str,
        aggregation: AggregationStrategy,
    ) -> Result<Vec<TokenSpan>>;
}

/// Sequence-to-sequence engine used for abstractive summarization.
#[async_trait::async_trait]
pub trait TextGenerator: Engine {
    /// Generates a summary of `text` within the bounds of `params`.
    ///
    /// With `params.sample == false` the output must be deterministic for the
    /// same input and parameters.
    async fn generate(&self, text: &str, params: &GenerationParams) -> Result<String>;
}

/// Constructs a ready-to-use engine.
///
/// Loading may be slow (weights, remote warm-up) and is performed exactly once
/// per engine by the lifecycle manager.
#[async_trait::async_trait]
pub trait EngineLoader<E: ?Sized + Engine>: Send + Sync {
    /// Identifier of the model this loader produces.
    fn model_name(&self) -> &str;

    /// Loads the engine.
    async fn load(&self) -> Result<Arc<E>>;
}

/// Boxed loader for the NER engine.
pub type BoxedClassifierLoader = Box<dyn EngineLoader<dyn TokenClassifier>>;

/// Boxed loader for the summarization engine.
pub type BoxedGeneratorLoader = Box<dyn EngineLoader<dyn TextGenerator>>;
