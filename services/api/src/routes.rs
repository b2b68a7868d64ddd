use crate::infra::{AppState, ConfiguredStore};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use rfp_engine::catalog::QuestionCatalog;
use rfp_engine::comparison::{comparison_router, ComparisonRegistry};
use rfp_engine::responses::{response_router, AutoSaveCoordinator};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_engine_routes(
    autosave: Arc<AutoSaveCoordinator<ConfiguredStore>>,
    comparisons: Arc<ComparisonRegistry>,
) -> axum::Router {
    response_router(autosave)
        .merge(comparison_router(comparisons))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/catalog", axum::routing::get(catalog_endpoint))
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

/// Question template served to the answer wizard.
pub(crate) async fn catalog_endpoint() -> Json<serde_json::Value> {
    let catalog = QuestionCatalog::standard();
    Json(json!({
        "questions": catalog.questions(),
        "sections": catalog.sections(),
    }))
}
