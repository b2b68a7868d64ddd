use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tracing::debug;

use super::domain::{ResponseKey, ResponseRecord, ResponseValue, SubjectId};
use super::lifecycle::{LifecycleError, ResponseLifecycleManager};
use super::store::KeyValueStore;
use crate::catalog::QuestionId;

/// Cancellable delayed work keyed by target. Scheduling a key supersedes whatever was pending
/// for it, so at most one entry per key exists and only the last payload survives.
#[derive(Debug)]
pub struct DebounceScheduler<K, V> {
    quiet_period: Duration,
    next_ticket: u64,
    pending: HashMap<K, PendingEntry<V>>,
}

#[derive(Debug)]
struct PendingEntry<V> {
    ticket: u64,
    due_at: Instant,
    payload: V,
}

impl<K, V> DebounceScheduler<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            next_ticket: 0,
            pending: HashMap::new(),
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// Cancel-then-schedule. Returns the instant the payload becomes due.
    pub fn schedule(&mut self, key: K, payload: V, now: Instant) -> Instant {
        let due_at = now + self.quiet_period;
        self.next_ticket += 1;
        self.pending.insert(
            key,
            PendingEntry {
                ticket: self.next_ticket,
                due_at,
                payload,
            },
        );
        due_at
    }

    pub fn cancel(&mut self, key: &K) -> Option<V> {
        self.pending.remove(key).map(|entry| entry.payload)
    }

    pub fn is_pending(&self, key: &K) -> bool {
        self.pending.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.pending.values().map(|entry| entry.due_at).min()
    }

    /// Remove and return every payload whose quiet period has elapsed, oldest schedule first.
    pub fn take_due(&mut self, now: Instant) -> Vec<(K, V)> {
        let due_keys: Vec<K> = self
            .pending
            .iter()
            .filter(|(_, entry)| entry.due_at <= now)
            .map(|(key, _)| key.clone())
            .collect();

        self.remove_ordered(due_keys)
    }

    /// Remove and return everything still pending regardless of deadline.
    pub fn drain(&mut self) -> Vec<(K, V)> {
        let keys: Vec<K> = self.pending.keys().cloned().collect();
        self.remove_ordered(keys)
    }

    fn remove_ordered(&mut self, keys: Vec<K>) -> Vec<(K, V)> {
        let mut entries: Vec<(K, PendingEntry<V>)> = keys
            .into_iter()
            .filter_map(|key| self.pending.remove(&key).map(|entry| (key, entry)))
            .collect();
        entries.sort_by_key(|(_, entry)| (entry.due_at, entry.ticket));
        entries
            .into_iter()
            .map(|(key, entry)| (key, entry.payload))
            .collect()
    }
}

/// Debounces rapid edits into one lifecycle write per (subject, question) per pause in input.
pub struct AutoSaveCoordinator<S: ?Sized> {
    manager: Arc<ResponseLifecycleManager<S>>,
    scheduler: Mutex<DebounceScheduler<ResponseKey, Option<ResponseValue>>>,
}

impl<S> AutoSaveCoordinator<S>
where
    S: KeyValueStore + ?Sized,
{
    pub fn new(manager: Arc<ResponseLifecycleManager<S>>, quiet_period: Duration) -> Self {
        Self {
            manager,
            scheduler: Mutex::new(DebounceScheduler::new(quiet_period)),
        }
    }

    pub fn manager(&self) -> &Arc<ResponseLifecycleManager<S>> {
        &self.manager
    }

    fn scheduler(&self) -> MutexGuard<'_, DebounceScheduler<ResponseKey, Option<ResponseValue>>> {
        self.scheduler.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register an edit; any earlier pending edit for the same question is discarded.
    pub fn on_change(
        &self,
        subject_id: SubjectId,
        question_id: QuestionId,
        value: Option<ResponseValue>,
        now: Instant,
    ) -> Instant {
        let key = ResponseKey::new(subject_id, question_id);
        let mut scheduler = self.scheduler();
        let superseded = scheduler.is_pending(&key);
        let due_at = scheduler.schedule(key.clone(), value, now);
        debug!(
            subject = %key.subject_id,
            question = %key.question_id,
            superseded,
            "autosave scheduled"
        );
        due_at
    }

    pub fn cancel(&self, subject_id: &SubjectId, question_id: &QuestionId) -> bool {
        let key = ResponseKey::new(subject_id.clone(), question_id.clone());
        self.scheduler().cancel(&key).is_some()
    }

    /// Persist the pending edit for one question ahead of its quiet period, if there is one.
    pub fn flush_key(&self, subject_id: &SubjectId, question_id: &QuestionId) -> Option<ResponseRecord> {
        let key = ResponseKey::new(subject_id.clone(), question_id.clone());
        let value = self.scheduler().cancel(&key)?;
        debug!(subject = %subject_id, question = %question_id, "autosave flushed early");
        Some(self.manager.record_answer(subject_id, question_id, value))
    }

    /// Mark a question complete against its latest typed value, not the last autosaved one.
    pub fn complete(
        &self,
        subject_id: &SubjectId,
        question_id: &QuestionId,
    ) -> Result<ResponseRecord, LifecycleError> {
        self.flush_key(subject_id, question_id);
        self.manager.mark_complete(subject_id, question_id)
    }

    pub fn pending(&self) -> usize {
        self.scheduler().len()
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.scheduler().next_due()
    }

    /// Persist every edit whose quiet period has elapsed by `now`.
    pub fn flush_due(&self, now: Instant) -> Vec<(ResponseKey, ResponseRecord)> {
        let due = self.scheduler().take_due(now);
        self.apply(due)
    }

    /// Drop every pending edit without writing it. Returns how many were discarded.
    pub fn discard_pending(&self) -> usize {
        self.scheduler().drain().len()
    }

    /// Persist everything still pending, e.g. on shutdown.
    pub fn flush_all(&self) -> Vec<(ResponseKey, ResponseRecord)> {
        let pending = self.scheduler().drain();
        self.apply(pending)
    }

    fn apply(
        &self,
        writes: Vec<(ResponseKey, Option<ResponseValue>)>,
    ) -> Vec<(ResponseKey, ResponseRecord)> {
        writes
            .into_iter()
            .map(|(key, value)| {
                let record = self
                    .manager
                    .record_answer(&key.subject_id, &key.question_id, value);
                (key, record)
            })
            .collect()
    }
}
