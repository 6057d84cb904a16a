#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod client;
mod engine;
mod error;

pub use crate::client::{
    DEFAULT_BASE_URL, DEFAULT_NER_MODEL, DEFAULT_SUMMARIZATION_MODEL, HuggingFaceBuilder,
    HuggingFaceClient, HuggingFaceConfig, InferenceOptions, InferenceRequest,
};
pub use crate::engine::{HuggingFaceLoader, HuggingFaceSummarizer, HuggingFaceTokenClassifier};
pub use crate::error::{Error, Result};

/// Tracing target for Hugging Face operations.
pub const TRACING_TARGET: &str = "medlens_huggingface";
