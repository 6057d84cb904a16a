//! Per-engine handle owned by the lifecycle manager.

use std::ops::Deref;
use std::sync::{Arc, OnceLock};

use jiff::Timestamp;
use tokio::sync::{Mutex, MutexGuard};

use crate::engine::Engine;
use crate::types::EngineId;
use crate::{Error, Result};

struct Loaded<E: ?Sized> {
    engine: Arc<E>,
    gate: Option<Mutex<()>>,
    loaded_at: Timestamp,
}

/// Logical identity and load state of one engine.
///
/// The handle starts unready. The lifecycle manager records exactly one load
/// outcome: either the engine (ready from then on) or a failure message.
/// Reads are lock-free once the outcome is recorded.
pub struct ModelHandle<E: ?Sized> {
    engine_id: EngineId,
    model_name: String,
    loaded: OnceLock<Loaded<E>>,
    failure: OnceLock<String>,
}

impl<E: ?Sized + Engine> ModelHandle<E> {
    /// Creates an unready handle.
    pub fn new(engine_id: EngineId, model_name: impl Into<String>) -> Self {
        Self {
            engine_id,
            model_name: model_name.into(),
            loaded: OnceLock::new(),
            failure: OnceLock::new(),
        }
    }

    /// Which engine this handle tracks.
    pub fn engine_id(&self) -> EngineId {
        self.engine_id
    }

    /// Identifier of the model backing this engine.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Returns true once the engine has loaded successfully.
    pub fn is_ready(&self) -> bool {
        self.loaded.get().is_some()
    }

    /// When the engine became ready.
    pub fn loaded_at(&self) -> Option<Timestamp> {
        self.loaded.get().map(|loaded| loaded.loaded_at)
    }

    /// The recorded load failure, if loading failed.
    pub fn load_error(&self) -> Option<&str> {
        self.failure.get().map(String::as_str)
    }

    /// Returns true when calls are serialized behind a gate.
    pub fn is_gated(&self) -> bool {
        self.loaded.get().is_some_and(|loaded| loaded.gate.is_some())
    }

    /// Records a successful load. Later outcomes are ignored.
    pub(crate) fn mark_loaded(&self, engine: Arc<E>) -> bool {
        if self.failure.get().is_some() {
            return false;
        }

        let gate = (!engine.is_reentrant()).then(|| Mutex::new(()));
        self.loaded
            .set(Loaded {
                engine,
                gate,
                loaded_at: Timestamp::now(),
            })
            .is_ok()
    }

    /// Records a failed load. Later outcomes are ignored.
    pub(crate) fn mark_failed(&self, message: impl Into<String>) -> bool {
        if self.is_ready() {
            return false;
        }
        self.failure.set(message.into()).is_ok()
    }

    /// Error returned when the engine is needed but not loaded.
    pub fn unavailable(&self) -> Error {
        Error::model_unavailable()
            .with_message(format!("{} model not loaded", self.engine_id.display_name()))
    }

    /// Obtains the engine for the duration of one call.
    ///
    /// Waits for the gate of non-reentrant engines.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ModelUnavailable`] when the engine is not loaded.
    ///
    /// [`ErrorKind::ModelUnavailable`]: crate::ErrorKind::ModelUnavailable
    pub async fn acquire(&self) -> Result<EngineGuard<'_, E>> {
        let loaded = self.loaded.get().ok_or_else(|| self.unavailable())?;
        let permit = match &loaded.gate {
            Some(gate) => Some(gate.lock().await),
            None => None,
        };

        Ok(EngineGuard {
            engine: &loaded.engine,
            _permit: permit,
        })
    }
}

impl<E: ?Sized> std::fmt::Debug for ModelHandle<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHandle")
            .field("engine_id", &self.engine_id)
            .field("model_name", &self.model_name)
            .field("ready", &self.loaded.get().is_some())
            .field("failure", &self.failure.get())
            .finish()
    }
}

/// Borrowed access to a loaded engine, holding its gate if it has one.
pub struct EngineGuard<'a, E: ?Sized> {
    engine: &'a Arc<E>,
    _permit: Option<MutexGuard<'a, ()>>,
}

impl<E: ?Sized> Deref for EngineGuard<'_, E> {
    type Target = E;

    fn deref(&self) -> &Self::Target {
        self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    struct Stub {
        reentrant: bool,
    }

    impl Engine for Stub {
        fn is_reentrant(&self) -> bool {
            self.reentrant
        }
    }

    #[tokio::test]
    async fn unready_handle_reports_model_unavailable() {
        let handle = ModelHandle::<Stub>::new(EngineId::Ner, "stub");
        assert!(!handle.is_ready());

        let error = handle.acquire().await.err().unwrap();
        assert_eq!(error.kind(), ErrorKind::ModelUnavailable);
        assert_eq!(error.message(), Some("NER model not loaded"));
    }

    #[tokio::test]
    async fn first_outcome_wins() {
        let handle = ModelHandle::new(EngineId::Summarizer, "stub");
        assert!(handle.mark_loaded(Arc::new(Stub { reentrant: true })));
        assert!(!handle.mark_failed("too late"));
        assert!(!handle.mark_loaded(Arc::new(Stub { reentrant: true })));

        assert!(handle.is_ready());
        assert!(handle.loaded_at().is_some());
        assert_eq!(handle.load_error(), None);
        assert!(handle.acquire().await.is_ok());
    }

    #[tokio::test]
    async fn failed_handle_never_becomes_ready() {
        let handle = ModelHandle::new(EngineId::Ner, "stub");
        assert!(handle.mark_failed("weights missing"));
        assert!(!handle.mark_loaded(Arc::new(Stub { reentrant: true })));

        assert!(!handle.is_ready());
        assert_eq!(handle.load_error(), Some("weights missing"));
    }

    #[tokio::test]
    async fn non_reentrant_engines_are_gated() {
        let handle = ModelHandle::new(EngineId::Ner, "stub");
        handle.mark_loaded(Arc::new(Stub { reentrant: false }));
        assert!(handle.is_gated());

        let first = handle.acquire().await.unwrap();
        let second = tokio::time::timeout(
            std::time::Duration::from_millis(20),
            handle.acquire(),
        )
        .await;
        assert!(second.is_err());

        drop(first);
        assert!(handle.acquire().await.is_ok());
    }
}
