//! Request extractors with improved error handling and validation.
//!
//! Drop-in replacements for their `axum` counterparts that reject with the
//! server's [`Error`] type, so every malformed body produces the standard
//! error payload.
//!
//! [`Error`]: crate::handler::Error

mod json;
mod validated_json;

pub use self::json::Json;
pub use self::validated_json::ValidateJson;
