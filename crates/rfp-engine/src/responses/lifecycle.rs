use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use super::domain::{is_empty_value, ResponseRecord, ResponseStatus, ResponseValue, SubjectId};
use super::progress::{self, ProgressStats};
use super::repository::{
    clear_all, GlobalAnswerMap, GlobalAnswerStore, ResponseMap, ResponseStore,
};
use super::store::KeyValueStore;
use crate::catalog::{QuestionCatalog, QuestionId};

/// Owns the per-question status machine and the subject/global resolution order.
pub struct ResponseLifecycleManager<S: ?Sized> {
    catalog: Arc<QuestionCatalog>,
    responses: ResponseStore<S>,
    globals: GlobalAnswerStore<S>,
    /// Serializes read-modify-write cycles against the store.
    writes: Mutex<()>,
}

impl<S> ResponseLifecycleManager<S>
where
    S: KeyValueStore + ?Sized,
{
    pub fn new(store: Arc<S>, catalog: Arc<QuestionCatalog>) -> Self {
        Self {
            catalog,
            responses: ResponseStore::new(Arc::clone(&store)),
            globals: GlobalAnswerStore::new(store),
            writes: Mutex::new(()),
        }
    }

    fn write_guard(&self) -> MutexGuard<'_, ()> {
        self.writes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    /// Store a new value for the question. Completed records stay completed; otherwise the
    /// status follows the value's emptiness. Storage failures are logged, never returned.
    pub fn record_answer(
        &self,
        subject_id: &SubjectId,
        question_id: &QuestionId,
        value: Option<ResponseValue>,
    ) -> ResponseRecord {
        let _guard = self.write_guard();
        let current = self.responses.record(subject_id, question_id);
        let status = next_status(current.as_ref().map(|record| record.status), value.as_ref());
        let (completed_at, completed_value) = current
            .map(|record| (record.completed_at, record.completed_value))
            .unwrap_or_default();

        let record = ResponseRecord {
            status,
            updated_at: Utc::now(),
            completed_at,
            completed_value,
            value,
        };

        let shareable = !self.catalog.is_subject_specific(question_id);
        if shareable {
            if let Some(value) = record.value.as_ref().filter(|value| !value.is_empty()) {
                self.globals.set(question_id, value.clone());
            }
        }

        self.responses.put(subject_id, question_id, record.clone());
        debug!(
            subject = %subject_id,
            question = %question_id,
            status = record.status.label(),
            shareable,
            "recorded answer"
        );
        record
    }

    /// Force the question to `completed`. Required questions must carry a non-empty value.
    pub fn mark_complete(
        &self,
        subject_id: &SubjectId,
        question_id: &QuestionId,
    ) -> Result<ResponseRecord, LifecycleError> {
        let _guard = self.write_guard();
        let current = self.responses.record(subject_id, question_id);
        let value = current.and_then(|record| record.value);

        if self.catalog.is_required(question_id) && is_empty_value(value.as_ref()) {
            let prompt = self
                .catalog
                .question(question_id)
                .map(|question| question.prompt.clone())
                .unwrap_or_else(|| question_id.to_string());
            return Err(LifecycleError::RequiredAnswerMissing {
                question_id: question_id.clone(),
                prompt,
            });
        }

        let now = Utc::now();
        let record = ResponseRecord {
            completed_value: value.clone(),
            value,
            status: ResponseStatus::Completed,
            updated_at: now,
            completed_at: Some(now),
        };
        self.responses.put(subject_id, question_id, record.clone());
        info!(subject = %subject_id, question = %question_id, "question marked complete");
        Ok(record)
    }

    /// Subject record first, then the global fallback surfaced as `pre_filled`.
    pub fn resolve(&self, subject_id: &SubjectId, question_id: &QuestionId) -> Option<ResponseRecord> {
        if let Some(record) = self.responses.record(subject_id, question_id) {
            return Some(record);
        }

        self.globals.get(question_id).map(|value| ResponseRecord {
            value: Some(value),
            status: ResponseStatus::PreFilled,
            updated_at: Utc::now(),
            completed_at: None,
            completed_value: None,
        })
    }

    pub fn responses(&self, subject_id: &SubjectId) -> ResponseMap {
        self.responses.get(subject_id)
    }

    pub fn global_answers(&self) -> GlobalAnswerMap {
        self.globals.get_all()
    }

    pub fn progress(&self, subject_id: &SubjectId, total_questions: usize) -> ProgressStats {
        progress::calculate(&self.responses.get(subject_id), total_questions)
    }

    /// Progress measured against every question in the catalog.
    pub fn catalog_progress(&self, subject_id: &SubjectId) -> ProgressStats {
        self.progress(subject_id, self.catalog.len())
    }

    pub fn clear_subject(&self, subject_id: &SubjectId) {
        let _guard = self.write_guard();
        self.responses.clear(subject_id);
    }

    /// Remove all stored responses and global answers. Returns the number of subjects cleared.
    pub fn reset_demo(&self) -> usize {
        let _guard = self.write_guard();
        let cleared = clear_all(&self.responses, &self.globals);
        info!(subjects = cleared, "demo data reset");
        cleared
    }
}

pub fn next_status(current: Option<ResponseStatus>, value: Option<&ResponseValue>) -> ResponseStatus {
    match current {
        Some(ResponseStatus::Completed) => ResponseStatus::Completed,
        _ if is_empty_value(value) => ResponseStatus::NotStarted,
        _ => ResponseStatus::InProgress,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("\"{prompt}\" is required; add an answer before marking it complete")]
    RequiredAnswerMissing {
        question_id: QuestionId,
        prompt: String,
    },
}

/// Presentation state of a question relative to its persisted record. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditState {
    Fresh,
    Continue,
    Update,
}

impl EditState {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Fresh => "Fresh",
            Self::Continue => "Continue",
            Self::Update => "Update",
        }
    }
}

/// Completed records compare the in-flight value against the value captured at completion,
/// so an edit that has already been autosaved still reads as an update.
pub fn classify_edit(record: Option<&ResponseRecord>, in_flight: Option<&ResponseValue>) -> EditState {
    match record {
        Some(record) if record.is_completed() => {
            if record.completed_value.as_ref() == in_flight {
                EditState::Continue
            } else {
                EditState::Update
            }
        }
        _ => EditState::Fresh,
    }
}
