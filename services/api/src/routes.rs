use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

use civicflow::workflows::clearance::{
    clearance_router, ClearanceWorkflowService, LedgerRepository, ProgressNotifier,
};

pub(crate) fn with_clearance_routes<R, N>(
    service: Arc<ClearanceWorkflowService<R, N>>,
) -> axum::Router
where
    R: LedgerRepository + 'static,
    N: ProgressNotifier + 'static,
{
    clearance_router(service)
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
    use crate::infra::{InMemoryLedgerRepository, InMemoryProgressNotifier};
    use axum::body::Body;
    use axum::http::Request;
    use civicflow::workflows::clearance::CatalogSet;
    use serde_json::Value;
    use tower::ServiceExt;

    fn build_router() -> axum::Router {
        let repository = Arc::new(InMemoryLedgerRepository::default());
        let notifier = Arc::new(InMemoryProgressNotifier::default());
        let catalogs = CatalogSet::standard().expect("standard catalogs");
        let service = Arc::new(ClearanceWorkflowService::new(repository, notifier, catalogs));
        with_clearance_routes(service)
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(payload) = healthcheck().await;
        assert_eq!(payload.get("status"), Some(&serde_json::json!("ok")));
    }

    #[tokio::test]
    async fn catalog_endpoint_is_reachable_through_service_routes() {
        let router = build_router();
        let response = router
            .oneshot(
                Request::get("/api/v1/clearance/catalogs/building_permit")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(
            payload
                .get("clearances")
                .and_then(Value::as_array)
                .map(Vec::len),
            Some(10)
        );
    }
}
