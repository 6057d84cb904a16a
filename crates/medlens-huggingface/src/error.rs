//! Error types for the Hugging Face backend.

use thiserror::Error;

/// Result type alias for medlens-huggingface operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Hugging Face API operations.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),
    /// Response body could not be decoded.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// The API answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error reported by the API.
        message: String,
    },
    /// The model returned no output.
    #[error("Empty response from model '{0}'")]
    EmptyResponse(String),
    /// The client configuration is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Creates an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}

impl From<Error> for medlens_core::Error {
    fn from(err: Error) -> Self {
        let message = match &err {
            Error::Reqwest(e) if e.is_connect() => "Connection failed".to_owned(),
            Error::Reqwest(e) if e.is_timeout() => "Request timed out".to_owned(),
            Error::Api { message, .. } => message.clone(),
            other => other.to_string(),
        };

        medlens_core::Error::inference()
            .with_message(message)
            .with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use medlens_core::ErrorKind;

    use super::*;

    #[test]
    fn api_errors_become_inference_errors_with_api_message() {
        let err = Error::Api {
            status: 503,
            message: "Model is currently loading".to_owned(),
        };
        let core: medlens_core::Error = err.into();

        assert_eq!(core.kind(), ErrorKind::Inference);
        assert_eq!(core.message(), Some("Model is currently loading"));
    }

    #[test]
    fn empty_response_names_the_model() {
        let err = Error::EmptyResponse("facebook/bart-large-cnn".to_owned());
        assert_eq!(
            err.to_string(),
            "Empty response from model 'facebook/bart-large-cnn'"
        );
    }
}
