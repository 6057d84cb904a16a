//! Response types for HTTP handlers.

mod combined;
mod entities;
mod errors;
mod monitors;
mod summaries;

pub use combined::*;
pub use entities::*;
pub use errors::*;
pub use monitors::*;
pub use summaries::*;
