use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use idea_scorer::workflows::ideas::{idea_router, IdeaRepository, IdeaService};
use idea_scorer::workflows::scoring::Explainer;
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_idea_routes<R, E>(
    service: Arc<IdeaService<R, E>>,
    max_upload_bytes: usize,
) -> axum::Router
where
    R: IdeaRepository + 'static,
    E: Explainer + 'static,
{
    idea_router(service, max_upload_bytes)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryIdeaRepository;
    use axum::body::Body;
    use axum::http::Request;
    use idea_scorer::workflows::scoring::{ScoringEngine, SummaryExplainer, WeightConfiguration};
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn router() -> axum::Router {
        let service = Arc::new(IdeaService::new(
            Arc::new(InMemoryIdeaRepository::default()),
            Arc::new(SummaryExplainer),
            ScoringEngine::new(WeightConfiguration::default()).expect("valid weights"),
        ));
        with_idea_routes(service, 1024 * 1024)
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn health_route_is_mounted_beside_idea_routes() {
        let response = router()
            .oneshot(
                Request::get("/health")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);

        let response = router()
            .oneshot(
                Request::get("/api/v1/scores/summary")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn readiness_follows_the_flag() {
        let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(false)),
            metrics: Arc::new(recorder.handle()),
        };

        let response = readiness_endpoint(Extension(state.clone()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        state
            .readiness
            .store(true, std::sync::atomic::Ordering::Release);
        let response = readiness_endpoint(Extension(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
