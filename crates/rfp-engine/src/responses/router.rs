use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::autosave::AutoSaveCoordinator;
use super::domain::{ResponseRecord, ResponseValue, SubjectId};
use super::lifecycle::{classify_edit, EditState};
use super::progress::ProgressStats;
use super::repository::ResponseMap;
use super::store::KeyValueStore;
use crate::catalog::QuestionId;
use crate::error::AppError;

/// Body for answer writes; a missing or `null` value clears the answer.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AnswerPayload {
    #[serde(default)]
    pub value: Option<ResponseValue>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolvedResponseView {
    pub subject_id: SubjectId,
    pub question_id: QuestionId,
    pub record: Option<ResponseRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubjectResponsesView {
    pub subject_id: SubjectId,
    pub responses: ResponseMap,
    pub progress: ProgressStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct EditStateView {
    pub question_id: QuestionId,
    pub edit_state: EditState,
    pub edit_state_label: &'static str,
}

/// Router builder exposing response lifecycle, autosave and progress endpoints.
pub fn response_router<S>(autosave: Arc<AutoSaveCoordinator<S>>) -> Router
where
    S: KeyValueStore + ?Sized + 'static,
{
    Router::new()
        .route(
            "/api/v1/subjects/:subject_id/responses",
            get(list_handler::<S>),
        )
        .route(
            "/api/v1/subjects/:subject_id/responses/:question_id",
            get(resolve_handler::<S>).put(record_handler::<S>),
        )
        .route(
            "/api/v1/subjects/:subject_id/responses/:question_id/complete",
            post(complete_handler::<S>),
        )
        .route(
            "/api/v1/subjects/:subject_id/responses/:question_id/autosave",
            post(autosave_handler::<S>),
        )
        .route(
            "/api/v1/subjects/:subject_id/responses/:question_id/edit-state",
            post(edit_state_handler::<S>),
        )
        .route(
            "/api/v1/subjects/:subject_id/progress",
            get(progress_handler::<S>),
        )
        .route("/api/v1/demo/reset", post(reset_handler::<S>))
        .with_state(autosave)
}

pub(crate) async fn list_handler<S>(
    State(autosave): State<Arc<AutoSaveCoordinator<S>>>,
    Path(subject_id): Path<String>,
) -> Response
where
    S: KeyValueStore + ?Sized + 'static,
{
    let subject_id = SubjectId(subject_id);
    let manager = autosave.manager();
    let view = SubjectResponsesView {
        responses: manager.responses(&subject_id),
        progress: manager.catalog_progress(&subject_id),
        subject_id,
    };
    (StatusCode::OK, Json(view)).into_response()
}

pub(crate) async fn resolve_handler<S>(
    State(autosave): State<Arc<AutoSaveCoordinator<S>>>,
    Path((subject_id, question_id)): Path<(String, String)>,
) -> Response
where
    S: KeyValueStore + ?Sized + 'static,
{
    let subject_id = SubjectId(subject_id);
    let question_id = QuestionId(question_id);
    let record = autosave.manager().resolve(&subject_id, &question_id);
    let view = ResolvedResponseView {
        subject_id,
        question_id,
        record,
    };
    (StatusCode::OK, Json(view)).into_response()
}

pub(crate) async fn record_handler<S>(
    State(autosave): State<Arc<AutoSaveCoordinator<S>>>,
    Path((subject_id, question_id)): Path<(String, String)>,
    Json(payload): Json<AnswerPayload>,
) -> Response
where
    S: KeyValueStore + ?Sized + 'static,
{
    let subject_id = SubjectId(subject_id);
    let question_id = QuestionId(question_id);
    // an explicit write supersedes any debounced edit still waiting for the same question
    autosave.cancel(&subject_id, &question_id);
    let record = autosave
        .manager()
        .record_answer(&subject_id, &question_id, payload.value);
    (StatusCode::OK, Json(record)).into_response()
}

pub(crate) async fn complete_handler<S>(
    State(autosave): State<Arc<AutoSaveCoordinator<S>>>,
    Path((subject_id, question_id)): Path<(String, String)>,
) -> Response
where
    S: KeyValueStore + ?Sized + 'static,
{
    let subject_id = SubjectId(subject_id);
    let question_id = QuestionId(question_id);
    match autosave.complete(&subject_id, &question_id) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn autosave_handler<S>(
    State(autosave): State<Arc<AutoSaveCoordinator<S>>>,
    Path((subject_id, question_id)): Path<(String, String)>,
    Json(payload): Json<AnswerPayload>,
) -> Response
where
    S: KeyValueStore + ?Sized + 'static,
{
    let now = Instant::now();
    let due_at = autosave.on_change(
        SubjectId(subject_id),
        QuestionId(question_id),
        payload.value,
        now,
    );
    let payload = json!({
        "status": "scheduled",
        "due_in_ms": due_at.saturating_duration_since(now).as_millis() as u64,
    });
    (StatusCode::ACCEPTED, Json(payload)).into_response()
}

pub(crate) async fn edit_state_handler<S>(
    State(autosave): State<Arc<AutoSaveCoordinator<S>>>,
    Path((subject_id, question_id)): Path<(String, String)>,
    Json(payload): Json<AnswerPayload>,
) -> Response
where
    S: KeyValueStore + ?Sized + 'static,
{
    let subject_id = SubjectId(subject_id);
    let question_id = QuestionId(question_id);
    let record = autosave
        .manager()
        .responses(&subject_id)
        .remove(&question_id);
    let edit_state = classify_edit(record.as_ref(), payload.value.as_ref());
    let view = EditStateView {
        question_id,
        edit_state,
        edit_state_label: edit_state.label(),
    };
    (StatusCode::OK, Json(view)).into_response()
}

pub(crate) async fn progress_handler<S>(
    State(autosave): State<Arc<AutoSaveCoordinator<S>>>,
    Path(subject_id): Path<String>,
) -> Response
where
    S: KeyValueStore + ?Sized + 'static,
{
    let stats = autosave.manager().catalog_progress(&SubjectId(subject_id));
    (StatusCode::OK, Json(stats)).into_response()
}

pub(crate) async fn reset_handler<S>(
    State(autosave): State<Arc<AutoSaveCoordinator<S>>>,
) -> Response
where
    S: KeyValueStore + ?Sized + 'static,
{
    let pending_discarded = autosave.discard_pending();
    let cleared = autosave.manager().reset_demo();
    let payload = json!({
        "cleared_subjects": cleared,
        "discarded_autosaves": pending_discarded,
    });
    (StatusCode::OK, Json(payload)).into_response()
}
