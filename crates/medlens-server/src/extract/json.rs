//! JSON extractor that rejects with the server's error payload.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Json as AxumJson, OptionalFromRequest, Request};
use axum::response::{IntoResponse, Response};
use derive_more::{Deref, DerefMut, From};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::handler::{Error, ErrorKind};
use crate::middleware::MAX_BODY_SIZE;

/// JSON extractor and response.
///
/// Behaves like [`axum::Json`], but every rejection becomes a 400
/// [`Error`] whose message names what was wrong with the body: syntax,
/// shape, content type or size.
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    /// Creates a new [`Json`] wrapper around the provided value.
    #[inline]
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    /// Returns the inner value.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequest<S> for Json<T>
where
    T: DeserializeOwned + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let extractor = <AxumJson<T> as FromRequest<S>>::from_request(req, state).await;
        extractor.map(|x| Self::new(x.0)).map_err(Into::into)
    }
}

impl<T, S> OptionalFromRequest<S> for Json<T>
where
    T: DeserializeOwned + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Option<Self>, Self::Rejection> {
        match <Self as FromRequest<S>>::from_request(req, state).await {
            Ok(json) => Ok(Some(json)),
            Err(error) if error.kind() == ErrorKind::InternalServerError => Err(error),
            Err(_) => Ok(None),
        }
    }
}

impl<T> IntoResponse for Json<T>
where
    T: Serialize,
{
    #[inline]
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}

impl From<JsonRejection> for Error<'static> {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => ErrorKind::BadRequest
                .with_message("Invalid request data format")
                .with_context(format!(
                    "JSON deserialization failed: {}",
                    sanitize_error_message(&err.body_text())
                )),
            JsonRejection::JsonSyntaxError(err) => ErrorKind::BadRequest
                .with_message("Invalid JSON syntax in request body")
                .with_context(format!(
                    "JSON parsing failed: {}",
                    sanitize_error_message(&err.body_text())
                )),
            JsonRejection::MissingJsonContentType(_) => ErrorKind::BadRequest
                .with_message("Invalid content type")
                .with_context("Content-Type must be 'application/json'"),
            JsonRejection::BytesRejection(err) => {
                let message = err.body_text();
                if message.contains("length limit") {
                    ErrorKind::BadRequest
                        .with_message("Request body too large")
                        .with_context(format!(
                            "Request body exceeds the limit of {MAX_BODY_SIZE} bytes"
                        ))
                } else {
                    ErrorKind::BadRequest
                        .with_message("Failed to read request body")
                        .with_context(sanitize_error_message(&message))
                }
            }
            other => ErrorKind::InternalServerError
                .with_message("Request processing failed")
                .with_context(format!("Unexpected JSON rejection: {other:?}")),
        }
    }
}

/// Keeps rejection details short: first three lines, at most 200 chars.
fn sanitize_error_message(message: &str) -> String {
    let lines = message.lines().take(3).collect::<Vec<_>>();
    lines.join(" ").chars().take(200).collect()
}

impl<T> aide::OperationInput for Json<T>
where
    T: schemars::JsonSchema,
{
    fn operation_input(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) {
        AxumJson::<T>::operation_input(ctx, operation);
    }

    fn inferred_early_responses(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Vec<(Option<u16>, aide::openapi::Response)> {
        AxumJson::<T>::inferred_early_responses(ctx, operation)
    }
}

impl<T> aide::OperationOutput for Json<T>
where
    T: schemars::JsonSchema + Serialize,
{
    type Inner = T;

    fn operation_response(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Option<aide::openapi::Response> {
        AxumJson::<T>::operation_response(ctx, operation)
    }

    fn inferred_responses(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Vec<(Option<u16>, aide::openapi::Response)> {
        AxumJson::<T>::inferred_responses(ctx, operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_truncates_long_messages() {
        let long = "x".repeat(500);
        assert_eq!(sanitize_error_message(&long).len(), 200);

        let multiline = "one\ntwo\nthree\nfour";
        assert_eq!(sanitize_error_message(multiline), "one two three");
    }
}
