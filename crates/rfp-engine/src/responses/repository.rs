use std::collections::BTreeMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::domain::{ResponseRecord, ResponseValue, SubjectId};
use super::store::{KeyValueStore, StoreError};
use crate::catalog::QuestionId;

pub const RESPONSES_KEY_PREFIX: &str = "rfp_responses:";
pub const GLOBAL_ANSWERS_KEY: &str = "rfp_global_answers";

pub type ResponseMap = BTreeMap<QuestionId, ResponseRecord>;
pub type GlobalAnswerMap = BTreeMap<QuestionId, ResponseValue>;

pub fn responses_key(subject_id: &SubjectId) -> String {
    format!("{RESPONSES_KEY_PREFIX}{}", subject_id.as_str())
}

/// Raw object stored under `key`. Absence, a backend failure or a non-object value read as empty.
fn load_entries<S>(store: &S, key: &str) -> Map<String, Value>
where
    S: KeyValueStore + ?Sized,
{
    match store.get(key) {
        Ok(Some(Value::Object(entries))) => entries,
        Ok(Some(_)) => {
            warn!(key, "discarding store entry that is not a JSON object");
            Map::new()
        }
        Ok(None) => Map::new(),
        Err(err) => {
            warn!(key, error = %err, "store read failed, treating as empty");
            Map::new()
        }
    }
}

/// Decode each entry on its own so one unreadable answer does not hide its siblings.
fn load_map<S, T>(store: &S, key: &str) -> BTreeMap<QuestionId, T>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    load_entries(store, key)
        .into_iter()
        .filter_map(|(id, raw)| match serde_json::from_value(raw) {
            Ok(decoded) => Some((QuestionId(id), decoded)),
            Err(err) => {
                warn!(key, question = %id, error = %err, "skipping unreadable store entry");
                None
            }
        })
        .collect()
}

/// Replace one entry of the JSON object under `key`, leaving every other entry byte-for-byte
/// as stored. Failures are logged and reported as `false`; a failed read skips the write so a
/// transient outage cannot clobber the whole object.
fn save_entry<S, T>(store: &S, key: &str, question_id: &QuestionId, entry: &T) -> bool
where
    S: KeyValueStore + ?Sized,
    T: Serialize,
{
    let result = store.get(key).and_then(|current| {
        let mut entries = match current {
            Some(Value::Object(entries)) => entries,
            _ => Map::new(),
        };
        let encoded = serde_json::to_value(entry).map_err(|source| StoreError::Serialization {
            key: key.to_string(),
            source,
        })?;
        entries.insert(question_id.as_str().to_string(), encoded);
        store.set(key, Value::Object(entries))
    });

    match result {
        Ok(()) => true,
        Err(err) => {
            warn!(key, error = %err, "store write failed, change not persisted");
            false
        }
    }
}

/// Subject-scoped response records.
#[derive(Debug)]
pub struct ResponseStore<S: ?Sized> {
    store: Arc<S>,
}

impl<S> Clone for ResponseStore<S>
where
    S: ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> ResponseStore<S>
where
    S: KeyValueStore + ?Sized,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn get(&self, subject_id: &SubjectId) -> ResponseMap {
        load_map(self.store.as_ref(), &responses_key(subject_id))
    }

    pub fn record(&self, subject_id: &SubjectId, question_id: &QuestionId) -> Option<ResponseRecord> {
        self.get(subject_id).remove(question_id)
    }

    /// Returns whether the write reached the backend.
    pub fn put(
        &self,
        subject_id: &SubjectId,
        question_id: &QuestionId,
        record: ResponseRecord,
    ) -> bool {
        save_entry(
            self.store.as_ref(),
            &responses_key(subject_id),
            question_id,
            &record,
        )
    }

    pub fn clear(&self, subject_id: &SubjectId) {
        let key = responses_key(subject_id);
        if let Err(err) = self.store.remove(&key) {
            warn!(key = %key, error = %err, "failed to clear subject responses");
        }
    }

    /// Every subject with a stored response map.
    pub fn subjects(&self) -> Vec<SubjectId> {
        match self.store.keys() {
            Ok(keys) => keys
                .iter()
                .filter_map(|key| key.strip_prefix(RESPONSES_KEY_PREFIX))
                .map(SubjectId::new)
                .collect(),
            Err(err) => {
                warn!(error = %err, "unable to list stored subjects");
                Vec::new()
            }
        }
    }
}

/// Subject-independent answers reused to pre-fill new subjects.
#[derive(Debug)]
pub struct GlobalAnswerStore<S: ?Sized> {
    store: Arc<S>,
}

impl<S> Clone for GlobalAnswerStore<S>
where
    S: ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> GlobalAnswerStore<S>
where
    S: KeyValueStore + ?Sized,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn get_all(&self) -> GlobalAnswerMap {
        load_map(self.store.as_ref(), GLOBAL_ANSWERS_KEY)
    }

    pub fn get(&self, question_id: &QuestionId) -> Option<ResponseValue> {
        self.get_all().remove(question_id)
    }

    pub fn set(&self, question_id: &QuestionId, value: ResponseValue) -> bool {
        save_entry(self.store.as_ref(), GLOBAL_ANSWERS_KEY, question_id, &value)
    }

    pub fn clear(&self) {
        if let Err(err) = self.store.remove(GLOBAL_ANSWERS_KEY) {
            warn!(error = %err, "failed to clear global answers");
        }
    }
}

/// Delete every per-subject response map and the global answer map, leaving other keys intact.
/// Returns the number of subject maps removed.
pub fn clear_all<S>(responses: &ResponseStore<S>, globals: &GlobalAnswerStore<S>) -> usize
where
    S: KeyValueStore + ?Sized,
{
    let subjects = responses.subjects();
    for subject in &subjects {
        responses.clear(subject);
    }
    globals.clear();
    debug!(subjects = subjects.len(), "cleared stored responses");
    subjects.len()
}
