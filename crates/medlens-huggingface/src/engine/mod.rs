//! Engine implementations over the Inference API.

mod loader;
mod summarization;
mod token_classification;

pub use loader::HuggingFaceLoader;
pub use summarization::HuggingFaceSummarizer;
pub use token_classification::HuggingFaceTokenClassifier;
