use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::info;

use super::error::ComparisonError;
use super::scoring::StarRating;
use super::session::ComparisonSession;
use super::views::{ComparisonSummary, VendorScoreView, WeightChangeView};
use crate::catalog::{QuestionCatalog, QuestionId};
use crate::responses::SubjectId;

/// In-process owner of open comparison sessions, one per session id.
pub struct ComparisonRegistry {
    catalog: Arc<QuestionCatalog>,
    sessions: Mutex<HashMap<String, ComparisonSession>>,
    next_id: AtomicU64,
}

impl ComparisonRegistry {
    pub fn new(catalog: Arc<QuestionCatalog>) -> Self {
        Self {
            catalog,
            sessions: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn open(
        &self,
        subject_id: SubjectId,
        vendors: Vec<String>,
    ) -> Result<ComparisonSummary, ComparisonError> {
        let id = format!("cmp-{}", self.next_id.fetch_add(1, Ordering::Relaxed));
        let session = ComparisonSession::open(id.clone(), subject_id, &self.catalog, vendors)?;
        info!(
            session = %id,
            subject = %session.subject_id(),
            vendors = session.vendors().len(),
            "comparison session opened"
        );
        let summary = session.summary();
        self.sessions().insert(id, session);
        Ok(summary)
    }

    pub fn summary(&self, session_id: &str) -> Result<ComparisonSummary, ComparisonError> {
        self.with_session(session_id, |session| Ok(session.summary()))
    }

    pub fn set_weight(
        &self,
        session_id: &str,
        question_id: &QuestionId,
        requested: i64,
    ) -> Result<WeightChangeView, ComparisonError> {
        self.with_session(session_id, |session| session.set_weight(question_id, requested))
    }

    pub fn rate(
        &self,
        session_id: &str,
        vendor_id: &str,
        question_id: &QuestionId,
        stars: f64,
    ) -> Result<VendorScoreView, ComparisonError> {
        let rating = StarRating::new(stars)?;
        self.with_session(session_id, |session| session.rate(vendor_id, question_id, rating))
    }

    pub fn close(&self, session_id: &str) -> bool {
        self.sessions().remove(session_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn with_session<T>(
        &self,
        session_id: &str,
        action: impl FnOnce(&mut ComparisonSession) -> Result<T, ComparisonError>,
    ) -> Result<T, ComparisonError> {
        let mut sessions = self.sessions();
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| ComparisonError::UnknownSession(session_id.to_string()))?;
        action(session)
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<String, ComparisonSession>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
