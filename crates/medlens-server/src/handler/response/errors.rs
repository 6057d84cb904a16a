use std::borrow::Cow;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use schemars::JsonSchema;
use serde::Serialize;

/// HTTP error response body.
///
/// Only `name`, `message` and `resource` reach the client; the internal
/// context and the status code are kept for logging.
#[must_use = "error responses do nothing unless serialized"]
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ErrorResponse<'a> {
    /// The error name/type identifier
    pub name: Cow<'a, str>,
    /// User-friendly error message safe for client display
    pub message: Cow<'a, str>,
    /// The resource that the error relates to (optional, set by handler)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<Cow<'a, str>>,

    /// Internal context for debugging (optional, not exposed to client)
    #[serde(skip)]
    pub context: Option<Cow<'a, str>>,
    /// HTTP status code (not serialized in JSON)
    #[serde(skip)]
    pub status: StatusCode,
}

impl<'a> ErrorResponse<'a> {
    // 4xx Client Errors
    pub const BAD_REQUEST: Self = Self::new(
        "bad_request",
        "Invalid request data.",
        StatusCode::BAD_REQUEST,
    );
    // 5xx Server Errors
    pub const INTERNAL_SERVER_ERROR: Self = Self::new(
        "internal_server_error",
        "Internal server error.",
        StatusCode::INTERNAL_SERVER_ERROR,
    );
    pub const NOT_FOUND: Self =
        Self::new("not_found", "Resource not found.", StatusCode::NOT_FOUND);
    pub const SERVICE_UNAVAILABLE: Self = Self::new(
        "service_unavailable",
        "Service unavailable.",
        StatusCode::SERVICE_UNAVAILABLE,
    );

    /// Creates a new error response.
    #[inline]
    pub const fn new(name: &'a str, message: &'a str, status: StatusCode) -> Self {
        Self {
            name: Cow::Borrowed(name),
            message: Cow::Borrowed(message),
            resource: None,
            context: None,
            status,
        }
    }

    /// Sets the resource.
    /// If a resource already exists, it merges them with a separator.
    pub fn with_resource(mut self, resource: impl Into<Cow<'a, str>>) -> Self {
        let new_resource = resource.into();
        self.resource = Some(match self.resource {
            Some(existing) => Cow::Owned(format!("{}/{}", existing, new_resource)),
            None => new_resource,
        });
        self
    }

    /// Replaces the generic message with a specific one.
    pub fn with_message(mut self, message: impl Into<Cow<'a, str>>) -> Self {
        self.message = message.into();
        self
    }

    /// Attaches context to the error response.
    /// If context already exists, it merges them with a separator.
    pub fn with_context(mut self, context: impl Into<Cow<'a, str>>) -> Self {
        let new_context = context.into();
        self.context = Some(match self.context {
            Some(existing) => Cow::Owned(format!("{}; {}", existing, new_context)),
            None => new_context,
        });
        self
    }
}

impl Default for ErrorResponse<'_> {
    #[inline]
    fn default() -> Self {
        Self::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for ErrorResponse<'_> {
    fn into_response(self) -> Response {
        tracing::warn!(
            status = %self.status,
            name = %self.name,
            message = %self.message,
            resource = ?self.resource,
            context = ?self.context,
            "HTTP error response"
        );
        (self.status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_response_merging_resource() {
        let response = ErrorResponse::BAD_REQUEST
            .with_resource("request")
            .with_resource("text");

        assert_eq!(response.resource.as_deref(), Some("request/text"));
    }

    #[test]
    fn error_response_replacing_message() {
        let response = ErrorResponse::SERVICE_UNAVAILABLE.with_message("NER model not loaded");
        assert_eq!(&response.message, "NER model not loaded");
        assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn error_response_merging_context() {
        let response = ErrorResponse::INTERNAL_SERVER_ERROR
            .with_context("inference")
            .with_context("engine timed out");

        assert_eq!(
            response.context.as_deref(),
            Some("inference; engine timed out")
        );
    }

    #[test]
    fn error_response_serialization() -> anyhow::Result<()> {
        let response = ErrorResponse::BAD_REQUEST
            .with_message("Text input cannot be empty")
            .with_context("invalid_input");

        let json = serde_json::to_value(&response)?;
        assert_eq!(
            json,
            serde_json::json!({
                "name": "bad_request",
                "message": "Text input cannot be empty",
            })
        );

        Ok(())
    }
}
