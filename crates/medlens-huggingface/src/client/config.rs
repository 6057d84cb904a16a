//! Hugging Face client configuration.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use derive_builder::Builder;
use url::Url;

use crate::error::{Error, Result};

/// Default Inference API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";

/// Default token-classification model.
pub const DEFAULT_NER_MODEL: &str = "d4data/biomedical-ner-all";

/// Default summarization model.
pub const DEFAULT_SUMMARIZATION_MODEL: &str = "facebook/bart-large-cnn";

/// Configuration for the Hugging Face engines.
///
/// No request timeout is applied unless `timeout_secs` is set.
#[derive(Debug, Clone, Builder)]
#[cfg_attr(feature = "config", derive(Args))]
#[builder(
    name = "HuggingFaceBuilder",
    pattern = "owned",
    setter(into, strip_option, prefix = "with"),
    build_fn(validate = "Self::validate_config")
)]
pub struct HuggingFaceConfig {
    /// Base URL of the Inference API.
    #[cfg_attr(
        feature = "config",
        arg(long = "hf-base-url", env = "HF_BASE_URL", default_value = DEFAULT_BASE_URL)
    )]
    #[builder(setter(custom), default = "HuggingFaceConfig::default_base_url()")]
    pub base_url: Url,

    /// Bearer token sent with every request.
    #[cfg_attr(feature = "config", arg(long = "hf-api-token", env = "HF_API_TOKEN"))]
    #[builder(default)]
    pub api_token: Option<String>,

    /// Model used for named-entity recognition.
    #[cfg_attr(
        feature = "config",
        arg(long = "ner-model", env = "NER_MODEL", default_value = DEFAULT_NER_MODEL)
    )]
    #[builder(default = "DEFAULT_NER_MODEL.to_owned()")]
    pub ner_model: String,

    /// Model used for summarization.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "summarization-model",
            env = "SUMMARIZATION_MODEL",
            default_value = DEFAULT_SUMMARIZATION_MODEL
        )
    )]
    #[builder(default = "DEFAULT_SUMMARIZATION_MODEL.to_owned()")]
    pub summarization_model: String,

    /// Request timeout in seconds.
    #[cfg_attr(feature = "config", arg(long = "hf-timeout-secs", env = "HF_TIMEOUT_SECS"))]
    #[builder(default)]
    pub timeout_secs: Option<u64>,

    /// Ask the API to block until a cold model is loaded.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "hf-wait-for-model",
            env = "HF_WAIT_FOR_MODEL",
            default_value_t = true,
            action = clap::ArgAction::Set
        )
    )]
    #[builder(default = "true")]
    pub wait_for_model: bool,

    /// Run one inference per engine while loading.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "hf-warm-up",
            env = "HF_WARM_UP",
            default_value_t = true,
            action = clap::ArgAction::Set
        )
    )]
    #[builder(default = "true")]
    pub warm_up: bool,
}

impl Default for HuggingFaceConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            api_token: None,
            ner_model: DEFAULT_NER_MODEL.to_owned(),
            summarization_model: DEFAULT_SUMMARIZATION_MODEL.to_owned(),
            timeout_secs: None,
            wait_for_model: true,
            warm_up: true,
        }
    }
}

impl HuggingFaceConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> HuggingFaceBuilder {
        HuggingFaceBuilder::default()
    }

    fn default_base_url() -> Url {
        Url::parse(DEFAULT_BASE_URL).expect("Valid default URL")
    }

    /// Request timeout, if one is configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Checks values that clap cannot.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.cannot_be_a_base() {
            return Err(Error::invalid_config(format!(
                "Base URL '{}' cannot be used as a base",
                self.base_url
            )));
        }
        if self.ner_model.trim().is_empty() || self.summarization_model.trim().is_empty() {
            return Err(Error::invalid_config("Model identifiers must not be empty"));
        }
        if self.timeout_secs == Some(0) {
            return Err(Error::invalid_config("Timeout must be greater than 0"));
        }
        Ok(())
    }
}

impl HuggingFaceBuilder {
    /// Sets the base URL of the Inference API.
    pub fn with_base_url(mut self, url: &str) -> Result<Self> {
        self.base_url = Some(
            url.parse()
                .map_err(|e| Error::invalid_config(format!("Invalid base URL '{url}': {e}")))?,
        );
        Ok(self)
    }

    fn validate_config(&self) -> std::result::Result<(), String> {
        if let Some(Some(0)) = self.timeout_secs {
            return Err("Timeout must be greater than 0".to_owned());
        }

        let blank = |model: &Option<String>| model.as_deref().is_some_and(|m| m.trim().is_empty());
        if blank(&self.ner_model) || blank(&self.summarization_model) {
            return Err("Model identifiers must not be empty".to_owned());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_targets_public_models() {
        let config = HuggingFaceConfig::default();

        assert_eq!(config.base_url.as_str(), "https://api-inference.huggingface.co/");
        assert_eq!(config.ner_model, "d4data/biomedical-ner-all");
        assert_eq!(config.summarization_model, "facebook/bart-large-cnn");
        assert_eq!(config.timeout(), None);
        assert!(config.wait_for_model);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_sets_fields() {
        let config = HuggingFaceConfig::builder()
            .with_base_url("http://localhost:8080/hf")
            .expect("valid URL")
            .with_api_token("hf_secret")
            .with_timeout_secs(30u64)
            .with_warm_up(false)
            .build()
            .expect("valid config");

        assert_eq!(config.api_token.as_deref(), Some("hf_secret"));
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
        assert!(!config.warm_up);
        assert_eq!(config.ner_model, DEFAULT_NER_MODEL);
    }

    #[test]
    fn builder_rejects_invalid_values() {
        assert!(HuggingFaceConfig::builder().with_base_url("not a url").is_err());
        assert!(
            HuggingFaceConfig::builder()
                .with_timeout_secs(0u64)
                .build()
                .is_err()
        );
        assert!(
            HuggingFaceConfig::builder()
                .with_ner_model("  ")
                .build()
                .is_err()
        );
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let config = HuggingFaceConfig {
            timeout_secs: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
