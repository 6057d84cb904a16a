//! Observability middleware: request ids, trace spans and header redaction.

use axum::Router;
use axum::http::header;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer;
use tower_http::trace::TraceLayer;

/// Header carrying the request id.
const REQUEST_ID_HEADER: &str = "x-request-id";

/// Extension trait for `axum::`[`Router`] to apply observability middleware.
pub trait RouterObservabilityExt<S> {
    /// Layers observability middleware for request tracing and logging.
    ///
    /// Generates a unique request id, opens a tracing span per request,
    /// echoes the id in the response and redacts credentials from logs.
    fn with_observability(self) -> Self;
}

impl<S> RouterObservabilityExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_observability(self) -> Self {
        self.layer(PropagateRequestIdLayer::new(
            header::HeaderName::from_static(REQUEST_ID_HEADER),
        ))
        .layer(SetSensitiveRequestHeadersLayer::new([
            header::AUTHORIZATION,
            header::COOKIE,
        ]))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(
            header::HeaderName::from_static(REQUEST_ID_HEADER),
            MakeRequestUuid,
        ))
    }
}

#[cfg(test)]
mod tests {
    use axum::routing::get;
    use axum_test::TestServer;

    use super::*;

    #[tokio::test]
    async fn responses_carry_request_id() -> anyhow::Result<()> {
        let app: Router = Router::new()
            .route("/", get(|| async { "ok" }))
            .with_observability();
        let server = TestServer::new(app)?;

        let response = server.get("/").await;
        response.assert_status_ok();
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));

        Ok(())
    }
}
