//! HTTP client for the Hugging Face Inference API.

mod config;
mod huggingface_client;

pub use config::{
    DEFAULT_BASE_URL, DEFAULT_NER_MODEL, DEFAULT_SUMMARIZATION_MODEL, HuggingFaceBuilder,
    HuggingFaceConfig,
};
pub use huggingface_client::{HuggingFaceClient, InferenceOptions, InferenceRequest};
