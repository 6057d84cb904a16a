//! Middleware for `axum::Router` and HTTP request processing.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use axum::Router;
//! use medlens_server::middleware::{
//!     CorsConfig, RouterObservabilityExt, RouterRecoveryExt, RouterSecurityExt,
//! };
//!
//! let app: Router<()> = Router::new()
//!     .with_default_recovery()
//!     .with_observability()
//!     .with_security(&CorsConfig::default());
//! ```

mod observability;
mod open_api;
mod recovery;
mod security;

pub use observability::RouterObservabilityExt;
pub use open_api::{OpenApiConfig, RouterOpenApiExt};
pub use recovery::RouterRecoveryExt;
pub use security::{CorsConfig, RouterSecurityExt};

/// Maximum accepted request body size in bytes (1 MiB).
pub const MAX_BODY_SIZE: usize = 1024 * 1024;
