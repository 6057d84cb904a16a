//! Hugging Face Inference API client using reqwest.

use std::sync::Arc;
use std::time::Instant;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use super::HuggingFaceConfig;
use crate::TRACING_TARGET;
use crate::error::{Error, Result};

/// Request envelope accepted by every Inference API task.
#[derive(Debug, Clone, Serialize)]
pub struct InferenceRequest<'a, P> {
    /// Text to run the model on.
    pub inputs: &'a str,
    /// Task-specific parameters.
    pub parameters: P,
    /// Serving options.
    pub options: InferenceOptions,
}

/// Serving options of the Inference API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InferenceOptions {
    /// Block until a cold model is loaded instead of failing with 503.
    pub wait_for_model: bool,
    /// Allow the API to serve a cached result for identical input.
    pub use_cache: bool,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: String,
}

struct HuggingFaceClientInner {
    http: Client,
    config: HuggingFaceConfig,
}

impl std::fmt::Debug for HuggingFaceClientInner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HuggingFaceClientInner")
            .field("base_url", &self.config.base_url.as_str())
            .field("ner_model", &self.config.ner_model)
            .field("summarization_model", &self.config.summarization_model)
            .finish_non_exhaustive()
    }
}

/// Client for the Hugging Face Inference API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone, Debug)]
pub struct HuggingFaceClient {
    inner: Arc<HuggingFaceClientInner>,
}

impl HuggingFaceClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be created.
    pub fn new(config: HuggingFaceConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        tracing::debug!(
            target: TRACING_TARGET,
            base_url = %config.base_url,
            authenticated = config.api_token.is_some(),
            timeout_secs = config.timeout_secs,
            "Hugging Face client created",
        );

        Ok(Self {
            inner: Arc::new(HuggingFaceClientInner { http, config }),
        })
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &HuggingFaceConfig {
        &self.inner.config
    }

    /// Endpoint URL for `model`.
    pub fn model_url(&self, model: &str) -> Result<Url> {
        let mut url = self.inner.config.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::invalid_config("Base URL cannot be used as a base"))?
            .pop_if_empty()
            .push("models")
            .extend(model.split('/'));
        Ok(url)
    }

    /// Default serving options; caching is disabled for sampled requests.
    pub fn options(&self, sample: bool) -> InferenceOptions {
        InferenceOptions {
            wait_for_model: self.inner.config.wait_for_model,
            use_cache: !sample,
        }
    }

    /// Runs `model` on the request and decodes the response body.
    pub async fn infer<P, R>(&self, model: &str, request: &InferenceRequest<'_, P>) -> Result<R>
    where
        P: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = self.model_url(model)?;
        let started_at = Instant::now();

        let mut http_request = self.inner.http.post(url).json(request);
        if let Some(token) = &self.inner.config.api_token {
            http_request = http_request.bearer_auth(token);
        }

        let response = http_request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(
            target: TRACING_TARGET,
            model,
            status = status.as_u16(),
            elapsed_ms = started_at.elapsed().as_millis() as u64,
            "Inference request completed",
        );

        if !status.is_success() {
            return Err(api_error(status.as_u16(), &body));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Builds an API error from a non-success response body.
fn api_error(status: u16, body: &str) -> Error {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|parsed| parsed.error)
        .unwrap_or_else(|_| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                format!("HTTP {status}")
            } else {
                trimmed.chars().take(512).collect()
            }
        });

    Error::Api { status, message }
}
