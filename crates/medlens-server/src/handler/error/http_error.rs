//! HTTP error handling with builder pattern for dynamic error responses.

use std::borrow::Cow;
use std::fmt;

use aide::generate::GenContext;
use aide::openapi::Operation;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::handler::response::ErrorResponse;

/// The error type for HTTP handlers in the server.
///
/// Carries an [`ErrorKind`], which fixes the status code and error name,
/// plus an optional client-facing message, resource and internal context.
#[derive(Clone)]
#[must_use = "errors do nothing unless serialized"]
pub struct Error<'a> {
    kind: ErrorKind,
    context: Option<Cow<'a, str>>,
    message: Option<Cow<'a, str>>,
    resource: Option<Cow<'a, str>>,
}

impl Error<'static> {
    /// Creates a new [`Error`] with the specified kind.
    #[inline]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
            message: None,
            resource: None,
        }
    }
}

impl<'a> Error<'a> {
    /// Attaches internal context, logged but never serialized.
    #[inline]
    pub fn with_context(self, context: impl Into<Cow<'a, str>>) -> Self {
        Self {
            context: Some(context.into()),
            ..self
        }
    }

    /// Sets a custom user-friendly message for the error.
    #[inline]
    pub fn with_message(self, message: impl Into<Cow<'a, str>>) -> Self {
        Self {
            message: Some(message.into()),
            ..self
        }
    }

    /// Sets the resource that caused the error.
    #[inline]
    pub fn with_resource(self, resource: impl Into<Cow<'a, str>>) -> Self {
        Self {
            resource: Some(resource.into()),
            ..self
        }
    }

    /// Returns the error kind.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the context if present.
    #[inline]
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Returns the custom message if present.
    #[inline]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns the resource if present.
    #[inline]
    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    /// Converts this error into a static version by cloning all borrowed data.
    pub fn into_static(self) -> Error<'static> {
        Error {
            kind: self.kind,
            context: self.context.map(|c| Cow::Owned(c.into_owned())),
            message: self.message.map(|m| Cow::Owned(m.into_owned())),
            resource: self.resource.map(|r| Cow::Owned(r.into_owned())),
        }
    }
}

impl Default for Error<'static> {
    #[inline]
    fn default() -> Self {
        Self::new(ErrorKind::default())
    }
}

impl fmt::Debug for Error<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let response = self.kind.response();

        let mut debug_struct = f.debug_struct("Error");
        debug_struct
            .field("kind", &self.kind)
            .field("name", &response.name)
            .field("status", &response.status);

        if let Some(ref context) = self.context {
            debug_struct.field("context", context);
        }

        if let Some(ref message) = self.message {
            debug_struct.field("custom_message", message);
        }

        if let Some(ref resource) = self.resource {
            debug_struct.field("custom_resource", resource);
        }

        debug_struct.finish()
    }
}

impl fmt::Display for Error<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let response = self.kind.response();
        let message = self.message.as_deref().unwrap_or(&response.message);

        write!(f, "{} ({}): {}", response.name, response.status, message)?;

        if let Some(ref context) = self.context {
            write!(f, " - {}", context)?;
        }

        if let Some(ref resource) = self.resource {
            write!(f, " [resource: {}]", resource)?;
        }

        Ok(())
    }
}

impl std::error::Error for Error<'_> {}

impl IntoResponse for Error<'_> {
    fn into_response(self) -> Response {
        let mut response = self.kind.response();

        if let Some(message) = self.message {
            response = response.with_message(message);
        }

        if let Some(resource) = self.resource {
            response = response.with_resource(resource);
        }

        if let Some(context) = self.context {
            response = response.with_context(context);
        }

        response.into_response()
    }
}

impl aide::OperationOutput for Error<'_> {
    type Inner = ErrorResponse<'static>;

    fn operation_response(
        ctx: &mut GenContext,
        operation: &mut Operation,
    ) -> Option<aide::openapi::Response> {
        axum::Json::<ErrorResponse<'static>>::operation_response(ctx, operation)
    }
}

impl From<ErrorKind> for Error<'static> {
    #[inline]
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

/// A specialized [`Result`] type for HTTP operations.
///
/// [`Result`]: std::result::Result
pub type Result<T, E = Error<'static>> = std::result::Result<T, E>;

/// Every HTTP error kind the server can answer with.
#[must_use = "error kinds do nothing unless used to create errors"]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    // 4xx Client Errors
    /// 400 Bad Request - Invalid request data
    BadRequest,
    /// 404 Not Found - Resource not found
    NotFound,

    // 5xx Server Errors
    /// 500 Internal Server Error - Unexpected server error
    #[default]
    InternalServerError,
    /// 503 Service Unavailable - A required model is not loaded
    ServiceUnavailable,
}

impl ErrorKind {
    /// Converts this error kind into a full [`Error`].
    #[inline]
    pub fn into_error(self) -> Error<'static> {
        Error::new(self)
    }

    /// Creates an [`Error`] with the specified context.
    #[inline]
    pub fn with_context<'a>(self, context: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error::new(self).with_context(context)
    }

    /// Creates an [`Error`] with the specified message.
    #[inline]
    pub fn with_message<'a>(self, message: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error::new(self).with_message(message)
    }

    /// Creates an [`Error`] with the specified resource.
    #[inline]
    pub fn with_resource<'a>(self, resource: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error::new(self).with_resource(resource)
    }

    /// Returns the HTTP status code for this error kind.
    #[inline]
    pub fn status_code(self) -> StatusCode {
        self.response().status
    }

    /// Returns the default response for this error kind.
    #[inline]
    pub fn response(self) -> ErrorResponse<'static> {
        match self {
            Self::BadRequest => ErrorResponse::BAD_REQUEST,
            Self::NotFound => ErrorResponse::NOT_FOUND,
            Self::InternalServerError => ErrorResponse::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable => ErrorResponse::SERVICE_UNAVAILABLE,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.response().name.as_ref())
    }
}

impl IntoResponse for ErrorKind {
    #[inline]
    fn into_response(self) -> Response {
        self.response().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_http_error() {
        let error = Error::default();
        assert_eq!(error.kind(), ErrorKind::InternalServerError);
        assert_eq!(
            error.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn status_codes() {
        assert_eq!(ErrorKind::BadRequest.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorKind::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorKind::ServiceUnavailable.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn error_builder_chaining() {
        let error = ErrorKind::BadRequest
            .with_message("Text input cannot be empty")
            .with_resource("text")
            .with_context("len: 0");

        assert_eq!(error.kind(), ErrorKind::BadRequest);
        assert_eq!(error.message(), Some("Text input cannot be empty"));
        assert_eq!(error.resource(), Some("text"));
        assert_eq!(error.context(), Some("len: 0"));
    }

    #[test]
    fn std_fmt_display() {
        let error = ErrorKind::ServiceUnavailable
            .with_message("NER model not loaded")
            .with_context("lifecycle not initialized");

        let display = format!("{}", error);
        assert!(display.contains("service_unavailable"));
        assert!(display.contains("503"));
        assert!(display.contains("NER model not loaded"));
        assert!(display.contains("lifecycle not initialized"));
    }

    #[test]
    fn std_fmt_debug() {
        let error = ErrorKind::NotFound.with_resource("route");
        let debug = format!("{:?}", error);
        assert!(debug.contains("NotFound"));
        assert!(debug.contains("route"));
    }

    #[test]
    fn error_into_static() {
        let message = String::from("Summarization model not loaded");
        let error = ErrorKind::ServiceUnavailable
            .with_message(message.as_str())
            .into_static();
        drop(message);

        assert_eq!(error.message(), Some("Summarization model not loaded"));
    }

    #[test]
    fn kind_display_uses_response_name() {
        assert_eq!(ErrorKind::BadRequest.to_string(), "bad_request");
        assert_eq!(
            ErrorKind::InternalServerError.to_string(),
            "internal_server_error"
        );
    }
}
