//! Error taxonomy shared by every layer of the orchestration core.

use strum::{AsRefStr, IntoStaticStr};
use thiserror::Error;

/// Type alias for boxed dynamic errors that can be sent across threads.
///
/// Used as the source error of [`Error`], so engine implementations can attach
/// whatever transport or runtime error caused a failure.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Type alias for Results with our custom Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Closed set of failure categories surfaced by the core.
///
/// Every failure reaching the caller of the orchestrator is exactly one of
/// these; the HTTP layer maps them to 400, 503 and 500 respectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// A request precondition was violated (empty text, inconsistent bounds).
    InvalidInput,
    /// The engine required by the request is not loaded.
    ModelUnavailable,
    /// The engine failed while serving a call.
    Inference,
}

/// A structured error type for medlens-core operations.
#[derive(Debug, Error)]
#[error("{kind:?}{}", message.as_ref().map(|m| format!(": {}", m)).unwrap_or_default())]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional error message.
    pub message: Option<String>,
    /// Optional source error.
    #[source]
    pub source: Option<BoxedError>,
}

impl Error {
    /// Creates a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            source: None,
        }
    }

    /// Adds a message to this error.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Adds a source error to this error.
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Creates a new invalid input error.
    pub fn invalid_input() -> Self {
        Self::new(ErrorKind::InvalidInput)
    }

    /// Creates a new model unavailable error.
    pub fn model_unavailable() -> Self {
        Self::new(ErrorKind::ModelUnavailable)
    }

    /// Creates a new inference error.
    pub fn inference() -> Self {
        Self::new(ErrorKind::Inference)
    }

    /// Re-tags this error as [`ErrorKind::Inference`], keeping message and source.
    ///
    /// Whatever an engine raises during a call is an inference failure from
    /// the caller's point of view.
    pub fn into_inference(self) -> Self {
        Self {
            kind: ErrorKind::Inference,
            ..self
        }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error kind as a string.
    pub fn kind_str(&self) -> &'static str {
        self.kind.into()
    }

    /// Returns the message, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns true when the caller is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidInput)
    }
}
