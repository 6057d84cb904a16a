use medlens_core::engine::{Engine, TextGenerator};
use medlens_core::types::GenerationParams;
use serde::{Deserialize, Serialize};

use crate::client::{HuggingFaceClient, InferenceRequest};
use crate::error::Error;

#[derive(Debug, Serialize)]
struct Parameters {
    max_length: u32,
    min_length: u32,
    do_sample: bool,
}

impl From<&GenerationParams> for Parameters {
    fn from(params: &GenerationParams) -> Self {
        Self {
            max_length: params.max_length,
            min_length: params.min_length,
            do_sample: params.sample,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Generated {
    summary_text: String,
}

/// Summarization model served by the Inference API.
///
/// Greedy or beam decoding is left to the model's generation config when
/// `do_sample` is false, which the API treats as deterministic.
#[derive(Debug, Clone)]
pub struct HuggingFaceSummarizer {
    client: HuggingFaceClient,
    model: String,
}

impl HuggingFaceSummarizer {
    /// Creates a summarizer for `model`.
    pub fn new(client: HuggingFaceClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

impl Engine for HuggingFaceSummarizer {}

#[async_trait::async_trait]
impl TextGenerator for HuggingFaceSummarizer {
    async fn generate(
        &self,
        text: &str,
        params: &GenerationParams,
    ) -> medlens_core::Result<String> {
        let request = InferenceRequest {
            inputs: text,
            parameters: Parameters::from(params),
            options: self.client.options(params.sample),
        };

        let generated: Vec<Generated> = self.client.infer(&self.model, &request).await?;
        let summary = generated
            .into_iter()
            .next()
            .ok_or_else(|| Error::EmptyResponse(self.model.clone()))?;

        Ok(summary.summary_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameters_forward_generation_bounds() {
        let params = GenerationParams::new(50, 10).with_sample(true);
        let value = serde_json::to_value(Parameters::from(&params)).unwrap();

        assert_eq!(value["max_length"], 50);
        assert_eq!(value["min_length"], 10);
        assert_eq!(value["do_sample"], true);
    }

    #[test]
    fn parses_summary_response() {
        let body = r#"[{"summary_text":"COPD is a progressive lung disease."}]"#;
        let generated: Vec<Generated> = serde_json::from_str(body).unwrap();
        assert_eq!(generated[0].summary_text, "COPD is a progressive lung disease.");
    }
}
