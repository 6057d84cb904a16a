use medlens_core::engine::{AggregationStrategy, Engine, TokenClassifier, TokenSpan};
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET;
use crate::client::{HuggingFaceClient, InferenceRequest};

#[derive(Debug, Serialize)]
struct Parameters {
    aggregation_strategy: AggregationStrategy,
}

/// One prediction as returned by the token-classification task.
///
/// Grouped output carries `entity_group`; raw token output carries `entity`.
#[derive(Debug, Deserialize)]
struct Prediction {
    #[serde(default)]
    entity_group: Option<String>,
    #[serde(default)]
    entity: Option<String>,
    score: f64,
    word: String,
    #[serde(default)]
    start: Option<usize>,
    #[serde(default)]
    end: Option<usize>,
}

/// Converts API predictions into engine spans, skipping unlabelled or
/// unanchored predictions.
fn into_spans(predictions: Vec<Prediction>) -> Vec<TokenSpan> {
    predictions
        .into_iter()
        .filter_map(|prediction| {
            let label = prediction.entity_group.or(prediction.entity);
            match (label, prediction.start, prediction.end) {
                (Some(label), Some(start), Some(end)) => Some(TokenSpan::new(
                    prediction.word,
                    label,
                    prediction.score,
                    start,
                    end,
                )),
                _ => {
                    tracing::debug!(
                        target: TRACING_TARGET,
                        word = %prediction.word,
                        "Skipping prediction without label or offsets",
                    );
                    None
                }
            }
        })
        .collect()
}

/// Token classifier served by the Inference API.
#[derive(Debug, Clone)]
pub struct HuggingFaceTokenClassifier {
    client: HuggingFaceClient,
    model: String,
}

impl HuggingFaceTokenClassifier {
    /// Creates a classifier for `model`.
    pub fn new(client: HuggingFaceClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

impl Engine for HuggingFaceTokenClassifier {}

#[async_trait::async_trait]
impl TokenClassifier for HuggingFaceTokenClassifier {
    async fn classify(
        &self,
        text: &str,
        aggregation: AggregationStrategy,
    ) -> medlens_core::Result<Vec<TokenSpan>> {
        let request = InferenceRequest {
            inputs: text,
            parameters: Parameters {
                aggregation_strategy: aggregation,
            },
            options: self.client.options(false),
        };

        let predictions: Vec<Prediction> = self.client.infer(&self.model, &request).await?;
        Ok(into_spans(predictions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_grouped_predictions() {
        let body = r#"[
            {"entity_group":"Disease_disorder","score":0.9987,"word":"diabetes","start":14,"end":22},
            {"entity_group":"Disease_disorder","score":0.91,"word":"alzheimer ' s disease","start":55,"end":74}
        ]"#;
        let predictions: Vec<Prediction> = serde_json::from_str(body).unwrap();
        let spans = into_spans(predictions);

        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].label, "Disease_disorder");
        assert_eq!((spans[1].start, spans[1].end), (55, 74));
    }

    #[test]
    fn parses_token_predictions_and_skips_unanchored() {
        let body = r###"[
            {"entity":"B-Sign_symptom","score":0.8,"word":"cough","start":3,"end":8,"index":2},
            {"entity":"I-Sign_symptom","score":0.7,"word":"##ing","start":null,"end":null}
        ]"###;
        let predictions: Vec<Prediction> = serde_json::from_str(body).unwrap();
        let spans = into_spans(predictions);

        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].label, "B-Sign_symptom");
    }

    #[test]
    fn parameters_use_snake_case_strategy() {
        let value = serde_json::to_value(Parameters {
            aggregation_strategy: AggregationStrategy::Simple,
        })
        .unwrap();
        assert_eq!(value["aggregation_strategy"], "simple");
    }
}
