//! Inference backend selection and startup policy.

use anyhow::Context;
use clap::{Args, ValueEnum};
use medlens_core::LifecycleManager;
use medlens_huggingface::{HuggingFaceClient, HuggingFaceConfig};
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// Which implementation serves the two inference engines.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EngineBackend {
    /// Hugging Face Inference API.
    #[default]
    #[value(name = "huggingface")]
    #[serde(rename = "huggingface")]
    HuggingFace,
    /// Deterministic in-process engines.
    #[cfg(feature = "mock")]
    Mock,
}

/// Output format of the log subscriber.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable, with ANSI colors.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Engine configuration.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct EngineConfig {
    /// Backend that loads the NER and summarization models.
    #[arg(long, env = "ENGINE_BACKEND", value_enum, default_value_t = EngineBackend::HuggingFace)]
    pub engine_backend: EngineBackend,

    /// Keep serving when a model fails to load.
    ///
    /// Requests that need the missing model are answered with 503 and the
    /// health endpoint reports "degraded".
    #[arg(long, env = "SERVE_DEGRADED", default_value_t = false)]
    #[serde(default)]
    pub serve_degraded: bool,

    /// Log output format.
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    #[serde(default)]
    pub log_format: LogFormat,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            engine_backend: EngineBackend::default(),
            serve_degraded: false,
            log_format: LogFormat::default(),
        }
    }
}

impl EngineConfig {
    /// Builds the uninitialized lifecycle for the Hugging Face backend.
    pub fn huggingface_lifecycle(config: &HuggingFaceConfig) -> anyhow::Result<LifecycleManager> {
        config
            .validate()
            .context("invalid Hugging Face configuration")?;

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            base_url = %config.base_url,
            ner_model = %config.ner_model,
            summarization_model = %config.summarization_model,
            has_api_token = config.api_token.is_some(),
            timeout_secs = ?config.timeout_secs,
            wait_for_model = config.wait_for_model,
            warm_up = config.warm_up,
            "Hugging Face configuration"
        );

        let client = HuggingFaceClient::new(config.clone())
            .context("failed to create Hugging Face client")?;
        Ok(client.into_lifecycle())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_huggingface() {
        let config = EngineConfig::default();
        assert_eq!(config.engine_backend, EngineBackend::HuggingFace);
        assert!(!config.serve_degraded);
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn huggingface_lifecycle_starts_unloaded() -> anyhow::Result<()> {
        let lifecycle = EngineConfig::huggingface_lifecycle(&HuggingFaceConfig::default())?;
        assert!(!lifecycle.is_initialized());
        Ok(())
    }

    #[test]
    fn huggingface_lifecycle_rejects_zero_timeout() {
        let config = HuggingFaceConfig {
            timeout_secs: Some(0),
            ..HuggingFaceConfig::default()
        };
        assert!(EngineConfig::huggingface_lifecycle(&config).is_err());
    }
}
