use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::matching::match_percentage;
use super::registry::ComparisonRegistry;
use crate::catalog::QuestionId;
use crate::error::AppError;
use crate::responses::SubjectId;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OpenComparisonRequest {
    pub subject_id: String,
    pub vendor_ids: Vec<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct WeightRequest {
    pub weight: i64,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct RatingRequest {
    pub stars: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchView {
    pub subject_id: String,
    pub vendor_id: String,
    pub match_percentage: u8,
}

/// Router builder for comparison sessions and the match estimate.
pub fn comparison_router(registry: Arc<ComparisonRegistry>) -> Router {
    Router::new()
        .route("/api/v1/comparisons", post(open_handler))
        .route("/api/v1/comparisons/:session_id", get(summary_handler))
        .route(
            "/api/v1/comparisons/:session_id/weights/:question_id",
            put(weight_handler),
        )
        .route(
            "/api/v1/comparisons/:session_id/ratings/:vendor_id/:question_id",
            put(rating_handler),
        )
        .route(
            "/api/v1/subjects/:subject_id/match/:vendor_id",
            get(match_handler),
        )
        .with_state(registry)
}

pub(crate) async fn open_handler(
    State(registry): State<Arc<ComparisonRegistry>>,
    Json(request): Json<OpenComparisonRequest>,
) -> Response {
    match registry.open(SubjectId(request.subject_id), request.vendor_ids) {
        Ok(summary) => (StatusCode::CREATED, Json(summary)).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn summary_handler(
    State(registry): State<Arc<ComparisonRegistry>>,
    Path(session_id): Path<String>,
) -> Response {
    match registry.summary(&session_id) {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn weight_handler(
    State(registry): State<Arc<ComparisonRegistry>>,
    Path((session_id, question_id)): Path<(String, String)>,
    Json(request): Json<WeightRequest>,
) -> Response {
    match registry.set_weight(&session_id, &QuestionId(question_id), request.weight) {
        Ok(change) => (StatusCode::OK, Json(change)).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn rating_handler(
    State(registry): State<Arc<ComparisonRegistry>>,
    Path((session_id, vendor_id, question_id)): Path<(String, String, String)>,
    Json(request): Json<RatingRequest>,
) -> Response {
    match registry.rate(
        &session_id,
        &vendor_id,
        &QuestionId(question_id),
        request.stars,
    ) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn match_handler(
    Path((subject_id, vendor_id)): Path<(String, String)>,
) -> Response {
    let view = MatchView {
        match_percentage: match_percentage(&subject_id, &vendor_id),
        subject_id,
        vendor_id,
    };
    (StatusCode::OK, Json(view)).into_response()
}
