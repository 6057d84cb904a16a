//! HTTP server startup and lifecycle management.

mod http_server;
mod lifecycle;
mod shutdown;

pub use http_server::serve;
