use std::sync::Arc;
use std::time::Instant;

use tokio::sync::OnceCell;

use super::{ModelHandle, TRACING_TARGET};
use crate::engine::{
    BoxedClassifierLoader, BoxedGeneratorLoader, Engine, EngineLoader, TextGenerator,
    TokenClassifier,
};
use crate::service::{ExtractionService, SummarizationService};
use crate::types::{EngineId, ModelNames, Readiness};
use crate::{Error, Result};

/// Owns both engine handles and loads them exactly once.
///
/// Construct one per process and share it behind an [`Arc`]. Nothing is
/// loaded until [`initialize`](Self::initialize) runs; until then every engine
/// reports unready.
pub struct LifecycleManager {
    ner: Arc<ModelHandle<dyn TokenClassifier>>,
    summarizer: Arc<ModelHandle<dyn TextGenerator>>,
    ner_loader: BoxedClassifierLoader,
    summarizer_loader: BoxedGeneratorLoader,
    initialized: OnceCell<()>,
}

impl LifecycleManager {
    /// Creates a manager with one loader per engine.
    pub fn new(ner_loader: BoxedClassifierLoader, summarizer_loader: BoxedGeneratorLoader) -> Self {
        let ner = ModelHandle::new(EngineId::Ner, ner_loader.model_name());
        let summarizer = ModelHandle::new(EngineId::Summarizer, summarizer_loader.model_name());

        Self {
            ner: Arc::new(ner),
            summarizer: Arc::new(summarizer),
            ner_loader,
            summarizer_loader,
            initialized: OnceCell::new(),
        }
    }

    /// Loads both engines concurrently.
    ///
    /// Idempotent: the first call performs the loads and records each
    /// outcome, later calls return the recorded outcome without reloading.
    /// Failed engines stay unready for the life of the manager.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ModelUnavailable`] describing the first engine
    /// (in [`EngineId::ALL`] order) that failed to load.
    ///
    /// [`ErrorKind::ModelUnavailable`]: crate::ErrorKind::ModelUnavailable
    pub async fn initialize(&self) -> Result<()> {
        self.initialized
            .get_or_init(|| async {
                tracing::info!(
                    target: TRACING_TARGET,
                    ner_model = %self.ner.model_name(),
                    summarization_model = %self.summarizer.model_name(),
                    "Loading inference engines",
                );

                tokio::join!(
                    load_engine(&self.ner, self.ner_loader.as_ref()),
                    load_engine(&self.summarizer, self.summarizer_loader.as_ref()),
                );
            })
            .await;

        self.outcome()
    }

    /// Returns true once [`initialize`](Self::initialize) has completed.
    pub fn is_initialized(&self) -> bool {
        self.initialized.initialized()
    }

    fn outcome(&self) -> Result<()> {
        for engine in EngineId::ALL {
            if let Some(failure) = self.load_error(engine) {
                return Err(Error::model_unavailable().with_message(format!(
                    "{} model failed to load: {failure}",
                    engine.display_name()
                )));
            }
        }
        Ok(())
    }

    /// Whether the given engine is loaded. Never blocks.
    pub fn is_ready(&self, engine: EngineId) -> bool {
        match engine {
            EngineId::Ner => self.ner.is_ready(),
            EngineId::Summarizer => self.summarizer.is_ready(),
        }
    }

    /// Snapshot of both engines' readiness.
    pub fn readiness(&self) -> Readiness {
        Readiness {
            ner: self.ner.is_ready(),
            summarizer: self.summarizer.is_ready(),
        }
    }

    /// Identifier of the model backing the given engine.
    pub fn model_name(&self, engine: EngineId) -> &str {
        match engine {
            EngineId::Ner => self.ner.model_name(),
            EngineId::Summarizer => self.summarizer.model_name(),
        }
    }

    /// Identifiers of both configured models.
    pub fn model_names(&self) -> ModelNames {
        ModelNames {
            ner: self.ner.model_name().to_owned(),
            summarization: self.summarizer.model_name().to_owned(),
        }
    }

    /// The recorded load failure of the given engine.
    pub fn load_error(&self, engine: EngineId) -> Option<&str> {
        match engine {
            EngineId::Ner => self.ner.load_error(),
            EngineId::Summarizer => self.summarizer.load_error(),
        }
    }

    /// Extraction service bound to the NER handle.
    pub fn extraction_service(&self) -> ExtractionService {
        ExtractionService::new(self.ner.clone())
    }

    /// Summarization service bound to the summarizer handle.
    pub fn summarization_service(&self) -> SummarizationService {
        SummarizationService::new(self.summarizer.clone())
    }
}

impl std::fmt::Debug for LifecycleManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleManager")
            .field("ner", &self.ner)
            .field("summarizer", &self.summarizer)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

async fn load_engine<E>(handle: &ModelHandle<E>, loader: &dyn EngineLoader<E>)
where
    E: ?Sized + Engine,
{
    let started = Instant::now();

    match loader.load().await {
        Ok(engine) => {
            handle.mark_loaded(engine);
            tracing::info!(
                target: TRACING_TARGET,
                engine = %handle.engine_id(),
                model = %handle.model_name(),
                gated = handle.is_gated(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Engine loaded",
            );
        }
        Err(error) => {
            let message = error.message().unwrap_or(error.kind_str()).to_owned();
            handle.mark_failed(message);
            tracing::error!(
                target: TRACING_TARGET,
                engine = %handle.engine_id(),
                model = %handle.model_name(),
                error = %error,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Engine failed to load",
            );
        }
    }
}
