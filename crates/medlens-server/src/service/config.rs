#[cfg(feature = "config")]
use clap::Args;
use medlens_core::OrchestratorConfig;
use serde::{Deserialize, Serialize};

/// App [`state`] configuration.
///
/// [`state`]: crate::service::ServiceState
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct ServiceConfig {
    /// Rejects summarization requests whose `min_length` exceeds `max_length`.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "STRICT_LENGTH_BOUNDS", default_value_t = false)
    )]
    #[serde(default)]
    pub strict_length_bounds: bool,
}

impl ServiceConfig {
    /// Enables or disables the `min_length <= max_length` check.
    pub fn with_strict_length_bounds(mut self, strict: bool) -> Self {
        self.strict_length_bounds = strict;
        self
    }

    /// Orchestration settings derived from this configuration.
    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig::default().with_strict_length_bounds(self.strict_length_bounds)
    }
}
