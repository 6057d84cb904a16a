//! Token-level to span-level aggregation.
//!
//! Engines that only emit per-token BIO predictions use [`merge_simple`] to
//! produce the same grouped output that [`AggregationStrategy::Simple`]
//! requires.
//!
//! [`AggregationStrategy::Simple`]: super::AggregationStrategy::Simple

use super::TokenSpan;
use crate::types::char_slice;

/// Label used for tokens outside any entity.
pub const OUTSIDE: &str = "O";

/// Prefix marking a subword continuation token.
pub const SUBWORD_PREFIX: &str = "##";

/// Splits a BIO label into its marker and entity type.
///
/// Labels without a `B-`/`I-` prefix are treated as beginning tokens.
fn split_label(label: &str) -> (bool, &str) {
    if let Some(entity) = label.strip_prefix("I-") {
        (true, entity)
    } else if let Some(entity) = label.strip_prefix("B-") {
        (false, entity)
    } else {
        (false, label)
    }
}

struct Group<'a> {
    entity: &'a str,
    scores: Vec<f64>,
    word: String,
    start: usize,
    end: usize,
}

impl Group<'_> {
    fn finish(self, text: &str) -> TokenSpan {
        let score = self.scores.iter().sum::<f64>() / self.scores.len() as f64;
        let word = char_slice(text, self.start, self.end)
            .map(str::to_owned)
            .unwrap_or(self.word);

        TokenSpan::new(word, self.entity, score, self.start, self.end)
    }
}

/// Merges token-level predictions into entity spans.
///
/// A token joins the open group when it carries the same entity type and is
/// either an `I-` token or a `##` subword piece; anything else closes the
/// group. `O` tokens are dropped. The merged score is the mean of the token
/// scores and the merged word is the slice of `text` covered by the group.
pub fn merge_simple(text: &str, tokens: &[TokenSpan]) -> Vec<TokenSpan> {
    let mut merged = Vec::new();
    let mut current: Option<Group<'_>> = None;

    for token in tokens {
        if token.label == OUTSIDE {
            if let Some(group) = current.take() {
                merged.push(group.finish(text));
            }
            continue;
        }

        let (inside, entity) = split_label(&token.label);
        let subword = token.word.starts_with(SUBWORD_PREFIX);

        match current.as_mut() {
            Some(group) if group.entity == entity && (inside || subword) => {
                group.scores.push(token.score);
                group.end = group.end.max(token.end);
                match token.word.strip_prefix(SUBWORD_PREFIX) {
                    Some(piece) => group.word.push_str(piece),
                    None => {
                        group.word.push(' ');
                        group.word.push_str(&token.word);
                    }
                }
            }
            _ => {
                if let Some(group) = current.take() {
                    merged.push(group.finish(text));
                }
                current = Some(Group {
                    entity,
                    scores: vec![token.score],
                    word: token.word.trim_start_matches(SUBWORD_PREFIX).to_owned(),
                    start: token.start,
                    end: token.end,
                });
            }
        }
    }

    if let Some(group) = current.take() {
        merged.push(group.finish(text));
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(word: &str, label: &str, score: f64, start: usize, end: usize) -> TokenSpan {
        TokenSpan::new(word, label, score, start, end)
    }

    #[test]
    fn merges_begin_and_inside_tokens() {
        let text = "History of Alzheimer's disease noted";
        let tokens = vec![
            token("History", "O", 0.99, 0, 7),
            token("Alzheimer's", "B-Disease_disorder", 0.9, 11, 22),
            token("disease", "I-Disease_disorder", 0.8, 23, 30),
            token("noted", "O", 0.99, 31, 36),
        ];

        let merged = merge_simple(text, &tokens);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].word, "Alzheimer's disease");
        assert_eq!(merged[0].label, "Disease_disorder");
        assert_eq!((merged[0].start, merged[0].end), (11, 30));
        assert!((merged[0].score - 0.85).abs() < 1e-9);
    }

    #[test]
    fn joins_subword_pieces_even_when_tagged_begin() {
        let text = "Given metformin daily";
        let tokens = vec![
            token("met", "B-Medication", 0.9, 6, 9),
            token("##formin", "B-Medication", 0.7, 9, 15),
        ];

        let merged = merge_simple(text, &tokens);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].word, "metformin");
        assert!((merged[0].score - 0.8).abs() < 1e-9);
    }

    #[test]
    fn splits_on_new_begin_or_type_change() {
        let text = "diabetes hypertension cough";
        let tokens = vec![
            token("diabetes", "B-Disease_disorder", 0.9, 0, 8),
            token("hypertension", "B-Disease_disorder", 0.9, 9, 21),
            token("cough", "I-Sign_symptom", 0.9, 22, 27),
        ];

        let merged = merge_simple(text, &tokens);
        let labels: Vec<_> = merged.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(
            labels,
            ["Disease_disorder", "Disease_disorder", "Sign_symptom"]
        );
        assert_eq!(merged[2].word, "cough");
    }

    #[test]
    fn falls_back_to_token_words_when_offsets_exceed_text() {
        let tokens = vec![
            token("heart", "B-Biological_structure", 0.6, 40, 45),
            token("failure", "I-Biological_structure", 0.8, 46, 53),
        ];

        let merged = merge_simple("short", &tokens);
        assert_eq!(merged[0].word, "heart failure");
    }

    #[test]
    fn empty_input_yields_no_spans() {
        assert!(merge_simple("", &[]).is_empty());
        assert!(merge_simple("a b", &[token("a", "O", 0.9, 0, 1)]).is_empty());
    }
}
