//! Request types for HTTP handlers.

mod summaries;
mod texts;

pub use summaries::*;
pub use texts::*;
