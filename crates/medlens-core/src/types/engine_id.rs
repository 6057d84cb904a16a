//! Engine identity and readiness snapshots.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, IntoStaticStr};

/// Identifies one of the two inference engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(AsRefStr, IntoStaticStr)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EngineId {
    /// Token-classification engine used for named-entity recognition.
    Ner,
    /// Sequence-to-sequence engine used for summarization.
    Summarizer,
}

impl EngineId {
    /// Both engines, in load order.
    pub const ALL: [EngineId; 2] = [EngineId::Ner, EngineId::Summarizer];

    /// Human-readable name used in error messages.
    pub fn display_name(self) -> &'static str {
        match self {
            EngineId::Ner => "NER",
            EngineId::Summarizer => "Summarization",
        }
    }
}

impl fmt::Display for EngineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Point-in-time readiness of both engines.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct Readiness {
    /// Whether the NER engine is loaded.
    pub ner: bool,
    /// Whether the summarization engine is loaded.
    pub summarizer: bool,
}

impl Readiness {
    /// Returns the readiness of a single engine.
    pub fn get(&self, engine: EngineId) -> bool {
        match engine {
            EngineId::Ner => self.ner,
            EngineId::Summarizer => self.summarizer,
        }
    }

    /// Returns true when both engines are loaded.
    pub fn all_ready(&self) -> bool {
        self.ner && self.summarizer
    }
}

/// Identifiers of the configured models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct ModelNames {
    /// Token-classification model.
    pub ner: String,
    /// Summarization model.
    pub summarization: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readiness_requires_both_engines() {
        let partial = Readiness {
            ner: true,
            summarizer: false,
        };
        assert!(partial.get(EngineId::Ner));
        assert!(!partial.get(EngineId::Summarizer));
        assert!(!partial.all_ready());
        assert!(!Readiness::default().all_ready());
    }

    #[test]
    fn engine_ids_use_snake_case() {
        assert_eq!(EngineId::Ner.to_string(), "ner");
        assert_eq!(EngineId::Summarizer.as_ref(), "summarizer");
        assert_eq!(EngineId::Summarizer.display_name(), "Summarization");
    }
}
