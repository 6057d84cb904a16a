//! Liveness and health response types.

use medlens_core::types::{ModelNames, Readiness};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::AsRefStr;

/// Response of `GET /`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ServiceInfo {
    /// Service banner.
    pub message: String,
    /// Always `active` while the process serves requests.
    pub status: String,
    /// Configured model identifiers.
    pub models: ModelNames,
}

impl ServiceInfo {
    /// Banner reported by the root endpoint.
    pub const MESSAGE: &'static str = "Biomedical NER & Summarization API";

    /// Builds the liveness payload.
    pub fn new(models: ModelNames) -> Self {
        Self {
            message: Self::MESSAGE.to_owned(),
            status: "active".to_owned(),
            models,
        }
    }
}

/// Aggregate service health.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum HealthStatus {
    /// Both engines are loaded.
    Healthy,
    /// At least one engine is not loaded.
    Degraded,
}

/// Response of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Health {
    /// `healthy` when every engine is loaded.
    pub status: HealthStatus,
    /// Per-engine readiness.
    pub models_loaded: Readiness,
}

impl From<Readiness> for Health {
    fn from(readiness: Readiness) -> Self {
        let status = if readiness.all_ready() {
            HealthStatus::Healthy
        } else {
            HealthStatus::Degraded
        };

        Self {
            status,
            models_loaded: readiness,
        }
    }
}
