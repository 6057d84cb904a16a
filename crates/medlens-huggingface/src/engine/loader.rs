use std::sync::Arc;

use medlens_core::engine::{
    AggregationStrategy, EngineLoader, TextGenerator, TokenClassifier,
};
use medlens_core::types::GenerationParams;
use medlens_core::{Error, LifecycleManager, Result};

use super::{HuggingFaceSummarizer, HuggingFaceTokenClassifier};
use crate::TRACING_TARGET;
use crate::client::HuggingFaceClient;

/// Input used to warm up both engines.
const WARM_UP_TEXT: &str = "The patient was treated for hypertension and type 2 diabetes.";

/// Loads one Inference API engine, optionally proving it with a warm-up call.
///
/// The same loader type serves both engines; the model it loads is taken from
/// the client configuration.
#[derive(Debug, Clone)]
pub struct HuggingFaceLoader {
    client: HuggingFaceClient,
    model: String,
}

impl HuggingFaceLoader {
    /// Loader for the configured NER model.
    pub fn ner(client: HuggingFaceClient) -> Self {
        let model = client.config().ner_model.clone();
        Self { client, model }
    }

    /// Loader for the configured summarization model.
    pub fn summarizer(client: HuggingFaceClient) -> Self {
        let model = client.config().summarization_model.clone();
        Self { client, model }
    }

    fn warm_up_enabled(&self) -> bool {
        self.client.config().warm_up
    }
}

impl HuggingFaceClient {
    /// Builds an uninitialized lifecycle manager over both remote engines.
    pub fn into_lifecycle(self) -> LifecycleManager {
        LifecycleManager::new(
            Box::new(HuggingFaceLoader::ner(self.clone())),
            Box::new(HuggingFaceLoader::summarizer(self)),
        )
    }
}

fn load_failed(model: &str, error: Error) -> Error {
    let message = match error.message() {
        Some(message) => format!("Warm-up of '{model}' failed: {message}"),
        None => format!("Warm-up of '{model}' failed"),
    };

    Error::model_unavailable()
        .with_message(message)
        .with_source(error)
}

#[async_trait::async_trait]
impl EngineLoader<dyn TokenClassifier> for HuggingFaceLoader {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn load(&self) -> Result<Arc<dyn TokenClassifier>> {
        let engine = HuggingFaceTokenClassifier::new(self.client.clone(), self.model.clone());

        if self.warm_up_enabled() {
            let spans = engine
                .classify(WARM_UP_TEXT, AggregationStrategy::Simple)
                .await
                .map_err(|error| load_failed(&self.model, error))?;
            tracing::debug!(
                target: TRACING_TARGET,
                model = %self.model,
                spans = spans.len(),
                "Token classifier warmed up",
            );
        }

        Ok(Arc::new(engine))
    }
}

#[async_trait::async_trait]
impl EngineLoader<dyn TextGenerator> for HuggingFaceLoader {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn load(&self) -> Result<Arc<dyn TextGenerator>> {
        let engine = HuggingFaceSummarizer::new(self.client.clone(), self.model.clone());

        if self.warm_up_enabled() {
            let summary = engine
                .generate(WARM_UP_TEXT, &GenerationParams::new(16, 1))
                .await
                .map_err(|error| load_failed(&self.model, error))?;
            tracing::debug!(
                target: TRACING_TARGET,
                model = %self.model,
                summary_chars = summary.len(),
                "Summarizer warmed up",
            );
        }

        Ok(Arc::new(engine))
    }
}
