//! Request orchestration across the two services.
//!
//! The orchestrator is the single entry point used by the HTTP layer. It
//! validates input once, checks readiness of exactly the engines a request
//! needs, dispatches to the services and reports each request phase as a
//! tracing event.

use std::future::Future;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, IntoStaticStr};

use crate::lifecycle::LifecycleManager;
use crate::service::{ExtractionService, SummarizationService, ensure_text};
use crate::types::{
    CombinedResult, EngineId, Entity, GenerationParams, ModelNames, Readiness, SummaryResult,
};
use crate::{Error, Result};

/// Tracing target for orchestration.
pub const TRACING_TARGET: &str = "medlens_core::orchestrator";

/// Orchestration settings.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Reject requests whose `min_length` exceeds `max_length`.
    #[serde(default)]
    pub strict_length_bounds: bool,
}

impl OrchestratorConfig {
    /// Enables or disables the length-bounds check.
    pub fn with_strict_length_bounds(mut self, strict: bool) -> Self {
        self.strict_length_bounds = strict;
        self
    }
}

/// Engines a request needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Exactly one engine.
    Single(EngineId),
    /// Both engines over the same input.
    Both,
}

impl Dispatch {
    /// Engines covered by this dispatch.
    pub fn engines(&self) -> &'static [EngineId] {
        match self {
            Dispatch::Single(EngineId::Ner) => &[EngineId::Ner],
            Dispatch::Single(EngineId::Summarizer) => &[EngineId::Summarizer],
            Dispatch::Both => &EngineId::ALL,
        }
    }
}

/// Public operations, as reported in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
    /// Entity extraction only.
    ExtractEntities,
    /// Summarization only.
    Summarize,
    /// Both services over the same text.
    ExtractAndSummarize,
}

/// Lifecycle of a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum RequestPhase {
    /// The request reached the orchestrator.
    Received,
    /// Text and bounds passed validation.
    Validated,
    /// Required engines are ready and the services were called.
    Dispatched,
    /// Every service call returned a result.
    Succeeded,
    /// Validation, readiness or a service call failed.
    Failed,
}

fn record_phase(operation: Operation, phase: RequestPhase) {
    tracing::debug!(
        target: TRACING_TARGET,
        operation = operation.as_ref(),
        phase = phase.as_ref(),
        "Request phase",
    );
}

/// Routes requests to the extraction and summarization services.
///
/// Cheap to clone; all clones share one lifecycle manager.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    lifecycle: Arc<LifecycleManager>,
    extraction: ExtractionService,
    summarization: SummarizationService,
    config: OrchestratorConfig,
}

impl Orchestrator {
    /// Creates an orchestrator over an explicitly constructed lifecycle.
    pub fn new(lifecycle: Arc<LifecycleManager>, config: OrchestratorConfig) -> Self {
        Self {
            extraction: lifecycle.extraction_service(),
            summarization: lifecycle.summarization_service(),
            lifecycle,
            config,
        }
    }

    /// Snapshot of engine readiness.
    pub fn readiness(&self) -> Readiness {
        self.lifecycle.readiness()
    }

    /// Identifiers of the configured models.
    pub fn model_names(&self) -> ModelNames {
        self.lifecycle.model_names()
    }

    /// Extracts entities from `text`.
    pub async fn extract_entities(&self, text: &str) -> Result<Vec<Entity>> {
        self.run(
            Operation::ExtractEntities,
            Dispatch::Single(EngineId::Ner),
            text,
            None,
            self.extraction.extract(text),
        )
        .await
    }

    /// Summarizes `text` with the given generation parameters.
    pub async fn summarize(&self, text: &str, params: GenerationParams) -> Result<SummaryResult> {
        self.run(
            Operation::Summarize,
            Dispatch::Single(EngineId::Summarizer),
            text,
            Some(&params),
            self.summarization.summarize(text, &params),
        )
        .await
    }

    /// Extracts entities and summarizes the same `text` concurrently.
    ///
    /// All-or-nothing: if either service fails the whole request fails.
    pub async fn extract_and_summarize(
        &self,
        text: &str,
        params: GenerationParams,
    ) -> Result<CombinedResult> {
        let combined = async {
            let (entities, summary) = tokio::try_join!(
                self.extraction.extract(text),
                self.summarization.summarize(text, &params),
            )?;
            Ok(CombinedResult::new(entities, summary))
        };

        self.run(
            Operation::ExtractAndSummarize,
            Dispatch::Both,
            text,
            Some(&params),
            combined,
        )
        .await
    }

    async fn run<T, F>(
        &self,
        operation: Operation,
        dispatch: Dispatch,
        text: &str,
        params: Option<&GenerationParams>,
        call: F,
    ) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        record_phase(operation, RequestPhase::Received);

        let result = async {
            self.validate(text, params)?;
            record_phase(operation, RequestPhase::Validated);

            self.check_readiness(dispatch)?;
            record_phase(operation, RequestPhase::Dispatched);

            call.await
        }
        .await;

        match &result {
            Ok(_) => record_phase(operation, RequestPhase::Succeeded),
            Err(error) if error.is_client_error() => {
                record_phase(operation, RequestPhase::Failed);
            }
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    operation = operation.as_ref(),
                    phase = RequestPhase::Failed.as_ref(),
                    kind = error.kind_str(),
                    error = %error,
                    "Request failed",
                );
            }
        }

        result
    }

    fn validate(&self, text: &str, params: Option<&GenerationParams>) -> Result<()> {
        ensure_text(text)?;

        if let Some(params) = params
            && self.config.strict_length_bounds
            && !params.has_consistent_bounds()
        {
            return Err(Error::invalid_input().with_message(format!(
                "min_length ({}) must not exceed max_length ({})",
                params.min_length, params.max_length
            )));
        }

        Ok(())
    }

    fn check_readiness(&self, dispatch: Dispatch) -> Result<()> {
        let missing = dispatch
            .engines()
            .iter()
            .find(|engine| !self.lifecycle.is_ready(**engine));

        match (missing, dispatch) {
            (None, _) => Ok(()),
            (Some(_), Dispatch::Both) => {
                Err(Error::model_unavailable().with_message("One or more models not loaded"))
            }
            (Some(engine), Dispatch::Single(_)) => Err(Error::model_unavailable()
                .with_message(format!("{} model not loaded", engine.display_name()))),
        }
    }
}
