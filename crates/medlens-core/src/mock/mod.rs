//! Deterministic in-process engines for tests and offline runs.
//!
//! # Feature Flag
//!
//! This module is only available when the `test-utils` feature is enabled:
//!
//! ```toml
//! [dev-dependencies]
//! medlens-core = { version = "...", features = ["test-utils"] }
//! ```
//!
//! The token classifier recognizes a small biomedical lexicon and emits
//! token-level BIO predictions, splitting long words into `##` subword
//! pieces, which are then merged by [`merge_simple`]. The text generator
//! returns the leading words of the input, sized from the generation bounds.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::engine::aggregation::{OUTSIDE, SUBWORD_PREFIX, merge_simple};
use crate::engine::{
    AggregationStrategy, Engine, EngineLoader, TextGenerator, TokenClassifier, TokenSpan,
};
use crate::lifecycle::LifecycleManager;
use crate::types::GenerationParams;
use crate::{Error, Result};

/// Phrases recognized by [`MockTokenClassifier`], longest first.
const LEXICON: &[(&str, &str)] = &[
    ("chronic obstructive pulmonary disease", "Disease_disorder"),
    ("alzheimer's disease", "Disease_disorder"),
    ("shortness of breath", "Sign_symptom"),
    ("type 2 diabetes", "Disease_disorder"),
    ("airflow limitation", "Sign_symptom"),
    ("inhaled corticosteroids", "Medication"),
    ("pulmonary rehabilitation", "Therapeutic_procedure"),
    ("diabetes", "Disease_disorder"),
    ("hypertension", "Disease_disorder"),
    ("copd", "Disease_disorder"),
    ("cough", "Sign_symptom"),
    ("wheezing", "Sign_symptom"),
    ("metformin", "Medication"),
    ("insulin", "Medication"),
    ("bronchodilators", "Medication"),
    ("spirometry", "Diagnostic_procedure"),
    ("lung", "Biological_structure"),
    ("lungs", "Biological_structure"),
];

/// Words longer than this are split into a head and a `##` piece.
const SUBWORD_THRESHOLD: usize = 8;

/// Configuration for the mock backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct MockConfig {
    /// Model identifier reported for the mock NER engine.
    #[cfg_attr(
        feature = "config",
        arg(long = "mock-ner-model", env = "MOCK_NER_MODEL", default_value = "mock/biomedical-ner")
    )]
    #[serde(default = "default_ner_model")]
    pub ner_model: String,

    /// Model identifier reported for the mock summarizer.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "mock-summarization-model",
            env = "MOCK_SUMMARIZATION_MODEL",
            default_value = "mock/summarizer"
        )
    )]
    #[serde(default = "default_summarization_model")]
    pub summarization_model: String,
}

fn default_ner_model() -> String {
    "mock/biomedical-ner".to_owned()
}

fn default_summarization_model() -> String {
    "mock/summarizer".to_owned()
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            ner_model: default_ner_model(),
            summarization_model: default_summarization_model(),
        }
    }
}

impl MockConfig {
    /// Builds an uninitialized lifecycle manager over the mock engines.
    pub fn into_lifecycle(self) -> LifecycleManager {
        let ner = MockLoader::ready(
            self.ner_model,
            Arc::new(MockTokenClassifier::default()) as Arc<dyn TokenClassifier>,
        );
        let summarizer = MockLoader::ready(
            self.summarization_model,
            Arc::new(MockTextGenerator::default()) as Arc<dyn TextGenerator>,
        );

        LifecycleManager::new(Box::new(ner), Box::new(summarizer))
    }
}

/// Counts calls that are in flight at the same time.
///
/// Shared between a mock engine and a test to observe how many calls the
/// engine served concurrently.
#[derive(Debug, Default)]
pub struct CallTracker {
    active: AtomicUsize,
    peak: AtomicUsize,
    total: AtomicUsize,
}

impl CallTracker {
    /// Highest number of simultaneous calls seen so far.
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// Number of calls started so far.
    pub fn total(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }

    fn enter(&self) -> ActiveCall<'_> {
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(active, Ordering::SeqCst);
        self.total.fetch_add(1, Ordering::SeqCst);
        ActiveCall(self)
    }
}

struct ActiveCall<'a>(&'a CallTracker);

impl Drop for ActiveCall<'_> {
    fn drop(&mut self) {
        self.0.active.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Enters `tracker` (if any) and yields once, so overlapping calls interleave.
async fn track_call(tracker: Option<&CallTracker>) -> Option<ActiveCall<'_>> {
    let call = tracker.map(CallTracker::enter);
    tokio::task::yield_now().await;
    call
}

/// Lexicon-driven token classifier.
#[derive(Debug, Clone)]
pub struct MockTokenClassifier {
    reentrant: bool,
    failure: Option<String>,
    tracker: Option<Arc<CallTracker>>,
}

impl Default for MockTokenClassifier {
    fn default() -> Self {
        Self {
            reentrant: true,
            failure: None,
            tracker: None,
        }
    }
}

impl MockTokenClassifier {
    /// A classifier whose every call fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Default::default()
        }
    }

    /// Marks the classifier as requiring serialized calls.
    pub fn non_reentrant(mut self) -> Self {
        self.reentrant = false;
        self
    }

    /// Reports every call to `tracker`.
    pub fn with_tracker(mut self, tracker: Arc<CallTracker>) -> Self {
        self.tracker = Some(tracker);
        self
    }

    fn tokens(text: &str) -> Vec<TokenSpan> {
        let words = split_words(text);
        let mut tokens = Vec::with_capacity(words.len());
        let mut index = 0;

        while index < words.len() {
            let Some((length, label)) = match_phrase(&words[index..]) else {
                let (word, start, end) = &words[index];
                tokens.push(TokenSpan::new(word.clone(), OUTSIDE, 0.99, *start, *end));
                index += 1;
                continue;
            };

            for (offset, (word, start, end)) in words[index..index + length].iter().enumerate() {
                let (tag, score) = if offset == 0 { ("B", 0.97) } else { ("I", 0.93) };
                let tagged = format!("{tag}-{label}");
                push_word(&mut tokens, word, *start, *end, &tagged, score);
            }
            index += length;
        }

        tokens
    }
}

impl Engine for MockTokenClassifier {
    fn is_reentrant(&self) -> bool {
        self.reentrant
    }
}

#[async_trait::async_trait]
impl TokenClassifier for MockTokenClassifier {
    async fn classify(
        &self,
        text: &str,
        aggregation: AggregationStrategy,
    ) -> Result<Vec<TokenSpan>> {
        let _call = track_call(self.tracker.as_deref()).await;
        if let Some(message) = &self.failure {
            return Err(Error::inference().with_message(message.clone()));
        }

        let tokens = Self::tokens(text);
        Ok(match aggregation {
            AggregationStrategy::None => tokens,
            AggregationStrategy::Simple => merge_simple(text, &tokens),
        })
    }
}

/// Extractive stand-in for a summarization model.
#[derive(Debug, Default)]
pub struct MockTextGenerator {
    non_reentrant: bool,
    failure: Option<String>,
    samples: AtomicU64,
    tracker: Option<Arc<CallTracker>>,
}

impl MockTextGenerator {
    /// A generator whose every call fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Default::default()
        }
    }

    /// Marks the generator as requiring serialized calls.
    pub fn non_reentrant(mut self) -> Self {
        self.non_reentrant = true;
        self
    }

    /// Reports every call to `tracker`.
    pub fn with_tracker(mut self, tracker: Arc<CallTracker>) -> Self {
        self.tracker = Some(tracker);
        self
    }
}

impl Engine for MockTextGenerator {
    fn is_reentrant(&self) -> bool {
        !self.non_reentrant
    }
}

#[async_trait::async_trait]
impl TextGenerator for MockTextGenerator {
    async fn generate(&self, text: &str, params: &GenerationParams) -> Result<String> {
        let _call = track_call(self.tracker.as_deref()).await;
        if let Some(message) = &self.failure {
            return Err(Error::inference().with_message(message.clone()));
        }

        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            return Ok(String::new());
        }

        let target = (words.len() / 2)
            .max(params.min_length as usize)
            .min(params.max_length as usize)
            .clamp(1, words.len());
        let offset = if params.sample {
            self.samples.fetch_add(1, Ordering::Relaxed) as usize % words.len()
        } else {
            0
        };

        let mut summary = words
            .iter()
            .cycle()
            .skip(offset)
            .take(target)
            .copied()
            .collect::<Vec<_>>()
            .join(" ");
        if !summary.ends_with('.') {
            summary.push('.');
        }

        Ok(summary)
    }
}

/// Loader returning a prepared engine or a prepared failure.
pub struct MockLoader<E: ?Sized> {
    model_name: String,
    outcome: std::result::Result<Arc<E>, String>,
    loads: Arc<AtomicUsize>,
}

impl<E: ?Sized> MockLoader<E> {
    /// A loader that yields `engine`.
    pub fn ready(model_name: impl Into<String>, engine: Arc<E>) -> Self {
        Self {
            model_name: model_name.into(),
            outcome: Ok(engine),
            loads: Arc::default(),
        }
    }

    /// A loader that fails with `message`.
    pub fn failing(model_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            outcome: Err(message.into()),
            loads: Arc::default(),
        }
    }

    /// Counter of load attempts, shared with the loader.
    pub fn load_counter(&self) -> Arc<AtomicUsize> {
        self.loads.clone()
    }
}

#[async_trait::async_trait]
impl<E> EngineLoader<E> for MockLoader<E>
where
    E: ?Sized + Engine + 'static,
{
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn load(&self) -> Result<Arc<E>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.outcome
            .clone()
            .map_err(|message| Error::model_unavailable().with_message(message))
    }
}

/// Splits text into words with character offsets, trimming edge punctuation.
fn split_words(text: &str) -> Vec<(String, usize, usize)> {
    let chars: Vec<char> = text.chars().collect();
    let is_edge = |c: char| c.is_ascii_punctuation() && c != '\'';
    let mut words = Vec::new();
    let mut index = 0;

    while index < chars.len() {
        if chars[index].is_whitespace() {
            index += 1;
            continue;
        }

        let mut end = index;
        while end < chars.len() && !chars[end].is_whitespace() {
            end += 1;
        }

        let (mut start, mut stop) = (index, end);
        while start < stop && is_edge(chars[start]) {
            start += 1;
        }
        while stop > start && is_edge(chars[stop - 1]) {
            stop -= 1;
        }
        if start < stop {
            words.push((chars[start..stop].iter().collect(), start, stop));
        }

        index = end;
    }

    words
}

/// Longest lexicon phrase starting at the first word.
fn match_phrase(words: &[(String, usize, usize)]) -> Option<(usize, &'static str)> {
    LEXICON.iter().find_map(|(phrase, label)| {
        let parts: Vec<&str> = phrase.split(' ').collect();
        let matches = parts.len() <= words.len()
            && parts
                .iter()
                .zip(words)
                .all(|(part, (word, _, _))| word.to_lowercase() == *part);
        matches.then_some((parts.len(), *label))
    })
}

fn push_word(tokens: &mut Vec<TokenSpan>, word: &str, start: usize, end: usize, label: &str, score: f64) {
    let length = end - start;
    if length <= SUBWORD_THRESHOLD {
        tokens.push(TokenSpan::new(word, label, score, start, end));
        return;
    }

    let head: String = word.chars().take(4).collect();
    let tail: String = word.chars().skip(4).collect();
    tokens.push(TokenSpan::new(head, label, score, start, start + 4));
    tokens.push(TokenSpan::new(
        format!("{SUBWORD_PREFIX}{tail}"),
        label,
        score - 0.04,
        start + 4,
        end,
    ));
}
