//! Engine lifecycle: one-shot loading and readiness tracking.

mod handle;
mod manager;

pub use handle::{EngineGuard, ModelHandle};
pub use manager::LifecycleManager;

/// Tracing target for lifecycle operations.
pub const TRACING_TARGET: &str = "medlens_core::lifecycle";
