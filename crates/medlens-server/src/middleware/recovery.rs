//! Recovery middleware for handler panics.

use std::any::Any;

use axum::Router;
use axum::response::{IntoResponse, Response};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;

use crate::handler::{Error, ErrorKind};

/// Tracing target for panic recovery.
const TRACING_TARGET_PANIC: &str = "medlens_server::recovery::panic";

type Panic = Box<dyn Any + Send + 'static>;

/// Extension trait for `axum::`[`Router`] to apply recovery middleware.
///
/// No request timeout is applied: inference calls run to completion.
pub trait RouterRecoveryExt<S> {
    /// Converts handler panics into 500 responses.
    fn with_default_recovery(self) -> Self;
}

impl<S> RouterRecoveryExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_default_recovery(self) -> Self {
        let middlewares = ServiceBuilder::new().layer(CatchPanicLayer::custom(catch_panic));

        self.layer(middlewares)
    }
}

fn catch_panic(err: Panic) -> Response {
    if let Some(error) = err.downcast_ref::<Error>() {
        tracing::error!(
            target: TRACING_TARGET_PANIC,
            error = %error,
            "service panic"
        );
        return error.clone().into_response();
    }

    let message = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic type");

    tracing::error!(
        target: TRACING_TARGET_PANIC,
        message = %message,
        "service panic"
    );

    Error::new(ErrorKind::InternalServerError)
        .with_message("An unexpected panic occurred")
        .into_response()
}
