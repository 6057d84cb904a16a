//! All `aide::`[`ApiRouter`]s with related `axum::`[`Handler`]s.
//!
//! [`ApiRouter`]: aide::axum::ApiRouter
//! [`Handler`]: axum::handler::Handler

mod combined;
mod entities;
mod error;
mod monitors;
pub mod request;
pub mod response;
mod summaries;

use aide::axum::ApiRouter;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
use crate::service::ServiceState;

#[inline]
async fn fallback() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns an [`ApiRouter`] with all routes and a 404 fallback.
pub fn routes() -> ApiRouter<ServiceState> {
    ApiRouter::new()
        .merge(monitors::routes())
        .merge(entities::routes())
        .merge(summaries::routes())
        .merge(combined::routes())
        .fallback(fallback)
}

#[cfg(test)]
pub(crate) mod test {
    use std::sync::Arc;

    use aide::axum::ApiRouter;
    use aide::openapi::OpenApi;
    use axum_test::TestServer;
    use medlens_core::LifecycleManager;
    use medlens_core::mock::MockConfig;

    use crate::handler::routes;
    use crate::service::{ServiceConfig, ServiceState};

    pub const DIABETES_TEXT: &str =
        "Patients suffering from diabetes and Alzheimer's disease are at risk.";

    /// About 150 words describing COPD.
    pub const COPD_TEXT: &str = "Chronic obstructive pulmonary disease (COPD) is a common, preventable, and treatable \
        disease characterized by persistent respiratory symptoms and airflow limitation that is \
        due to airway and/or alveolar abnormalities usually caused by significant exposure to \
        noxious particles or gases. The most common symptoms include dyspnea, chronic cough, and \
        sputum production. COPD is associated with significant morbidity and mortality worldwide, \
        leading to a substantial economic and social burden. Early diagnosis and management can \
        improve quality of life, reduce hospitalizations, and slow disease progression. Current \
        therapies include smoking cessation, pharmacologic treatments such as bronchodilators and \
        corticosteroids, pulmonary rehabilitation, and oxygen therapy in advanced cases. Diagnosis \
        is confirmed by spirometry showing a post-bronchodilator ratio of forced expiratory volume \
        to forced vital capacity below 0.70. Acute exacerbations, frequently triggered by \
        respiratory infections, present with worsening shortness of breath and wheezing and are \
        treated with short-acting bronchodilators, systemic corticosteroids and antibiotics when \
        bacterial infection is suspected.";

    pub const COMBINED_TEXT: &str = "Patients with diabetes and hypertension require careful \
        monitoring. COPD is a chronic condition that affects breathing.";

    /// Returns a new [`TestServer`] with the given router and state.
    pub async fn create_test_server_with_state(
        router: ApiRouter<ServiceState>,
        state: ServiceState,
    ) -> anyhow::Result<TestServer> {
        let mut api = OpenApi::default();
        let app = router.with_state(state).finish_api(&mut api);
        let server = TestServer::new(app)?;
        Ok(server)
    }

    async fn create_server(
        config: &ServiceConfig,
        initialize: bool,
    ) -> anyhow::Result<TestServer> {
        let lifecycle = Arc::new(MockConfig::default().into_lifecycle());
        if initialize {
            lifecycle.initialize().await?;
        }

        let state = ServiceState::from_config(config, lifecycle);
        create_test_server_with_state(routes(), state).await
    }

    /// Returns a [`TestServer`] over a lifecycle that failed to load.
    pub async fn create_failed_server() -> anyhow::Result<TestServer> {
        use medlens_core::engine::{TextGenerator, TokenClassifier};
        use medlens_core::mock::{MockLoader, MockTextGenerator};

        let ner = MockLoader::<dyn TokenClassifier>::failing("mock/ner", "weights missing");
        let summarizer = MockLoader::ready(
            "mock/summarizer",
            Arc::new(MockTextGenerator::default()) as Arc<dyn TextGenerator>,
        );
        let lifecycle = Arc::new(LifecycleManager::new(Box::new(ner), Box::new(summarizer)));
        let _ = lifecycle.initialize().await;

        let state = ServiceState::from_config(&ServiceConfig::default(), lifecycle);
        create_test_server_with_state(routes(), state).await
    }

    /// Returns a [`TestServer`] with both mock engines loaded.
    pub async fn create_test_server() -> anyhow::Result<TestServer> {
        create_server(&ServiceConfig::default(), true).await
    }

    /// Returns a [`TestServer`] with both mock engines loaded and `config` applied.
    pub async fn create_test_server_with_config(
        config: &ServiceConfig,
    ) -> anyhow::Result<TestServer> {
        create_server(config, true).await
    }

    /// Returns a [`TestServer`] whose engines were never loaded.
    pub async fn create_uninitialized_server() -> anyhow::Result<TestServer> {
        create_server(&ServiceConfig::default(), false).await
    }

    #[tokio::test]
    async fn unknown_route_returns_404() -> anyhow::Result<()> {
        let server = create_test_server().await?;

        let response = server.get("/does-not-exist").await;
        response.assert_status_not_found();

        let body = response.json::<serde_json::Value>();
        assert_eq!(body["name"], "not_found");

        Ok(())
    }

    #[tokio::test]
    async fn partially_loaded_service_stays_partially_available() -> anyhow::Result<()> {
        use axum::http::StatusCode;

        use crate::handler::request::{SummarizeRequest, TextInput};
        use crate::handler::response::{Health, HealthStatus};

        let server = create_failed_server().await?;

        let health = server.get("/health").await.json::<Health>();
        assert_eq!(health.status, HealthStatus::Degraded);
        assert!(!health.models_loaded.ner);
        assert!(health.models_loaded.summarizer);

        server
            .post("/extract-entities")
            .json(&TextInput::new(DIABETES_TEXT))
            .await
            .assert_status(StatusCode::SERVICE_UNAVAILABLE);
        server
            .post("/summarize")
            .json(&SummarizeRequest::new(COPD_TEXT))
            .await
            .assert_status_ok();

        Ok(())
    }
}
