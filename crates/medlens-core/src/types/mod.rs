//! Data model produced by the services and consumed by the HTTP layer.
//!
//! All values here are created fresh for a single request and are owned by
//! the response that carries them; nothing is cached or persisted.

mod combined;
mod engine_id;
mod entity;
mod summary;

pub use combined::CombinedResult;
pub use engine_id::{EngineId, ModelNames, Readiness};
pub use entity::Entity;
pub use summary::{DEFAULT_MAX_LENGTH, DEFAULT_MIN_LENGTH, GenerationParams, SummaryResult};

/// Rounds a value to two decimal places.
///
/// Confidence scores and compression ratios are exposed with this precision.
/// Exact halves round to the even neighbour (`0.125` becomes `0.12`).
#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Counts words by whitespace tokenization.
///
/// This is the word metric exposed to clients; it is unrelated to the subword
/// tokenization used inside the engines.
#[inline]
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Returns the substring between two character offsets.
///
/// Offsets count Unicode scalar values, not bytes. Returns `None` when the
/// range is reversed or extends past the end of the text.
pub fn char_slice(text: &str, start: usize, end: usize) -> Option<&str> {
    if start > end {
        return None;
    }

    let mut indices = text.char_indices().map(|(i, _)| i).chain(Some(text.len()));
    let byte_start = indices.nth(start)?;
    let byte_end = if end == start {
        byte_start
    } else {
        indices.nth(end - start - 1)?
    };

    text.get(byte_start..byte_end)
}
