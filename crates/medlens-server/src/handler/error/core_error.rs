//! Conversion of orchestration failures into HTTP errors.

use medlens_core::{Error as CoreError, ErrorKind as CoreErrorKind};

use super::{Error, ErrorKind};

/// Tracing target for core error conversion.
const TRACING_TARGET: &str = "medlens_server::handler::error";

impl From<CoreError> for Error<'static> {
    fn from(error: CoreError) -> Self {
        let kind = match error.kind() {
            CoreErrorKind::InvalidInput => ErrorKind::BadRequest,
            CoreErrorKind::ModelUnavailable => ErrorKind::ServiceUnavailable,
            CoreErrorKind::Inference => ErrorKind::InternalServerError,
        };

        if kind == ErrorKind::InternalServerError {
            tracing::error!(
                target: TRACING_TARGET,
                error = %error,
                source = ?std::error::Error::source(&error),
                "inference failed"
            );
        }

        let mut http_error = kind.into_error().with_context(error.kind_str());
        if let Some(message) = error.message {
            http_error = http_error.with_message(message);
        }

        http_error
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    #[test]
    fn kinds_map_to_status_codes() {
        let cases = [
            (CoreError::invalid_input(), StatusCode::BAD_REQUEST),
            (CoreError::model_unavailable(), StatusCode::SERVICE_UNAVAILABLE),
            (CoreError::inference(), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (core, status) in cases {
            let error = Error::from(core);
            assert_eq!(error.kind().status_code(), status);
        }
    }

    #[test]
    fn message_is_passed_through() {
        let core = CoreError::inference().with_message("CUDA out of memory");
        let error = Error::from(core);

        assert_eq!(error.message(), Some("CUDA out of memory"));
        assert_eq!(error.context(), Some("inference"));
    }
}
