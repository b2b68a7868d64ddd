use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::catalog::{FieldType, Question, QuestionCatalog, QuestionId};
use crate::responses::store::{KeyValueStore, MemoryKeyValueStore, StoreError};
use crate::responses::{ResponseLifecycleManager, SubjectId};

pub(super) const SHARED: &str = "q1";
pub(super) const OPTIONAL: &str = "q2";
pub(super) const BUDGET: &str = "rfp_budget";
pub(super) const CERTIFICATIONS: &str = "certifications";

pub(super) fn catalog() -> QuestionCatalog {
    QuestionCatalog::new(vec![
        Question::new(SHARED, "Overview", "Describe your company.", FieldType::FreeText)
            .required()
            .weighted(),
        Question::new(OPTIONAL, "Overview", "Anything else?", FieldType::FreeText),
        Question::new(
            BUDGET,
            "Pricing",
            "Quote for this RFP.",
            FieldType::FreeText,
        )
        .required()
        .subject_specific()
        .weighted(),
        Question::new(
            CERTIFICATIONS,
            "Overview",
            "Certifications held.",
            FieldType::MultiSelect,
        )
        .with_options(["SOC 2 Type II", "ISO 27001", "Other"]),
    ])
}

pub(super) fn subject(id: &str) -> SubjectId {
    SubjectId::new(id)
}

pub(super) fn question(id: &str) -> QuestionId {
    QuestionId::new(id)
}

pub(super) fn build_manager() -> (
    Arc<ResponseLifecycleManager<MemoryKeyValueStore>>,
    Arc<MemoryKeyValueStore>,
) {
    let store = Arc::new(MemoryKeyValueStore::default());
    let manager = Arc::new(ResponseLifecycleManager::new(
        store.clone(),
        Arc::new(catalog()),
    ));
    (manager, store)
}

/// Backend that is entirely offline.
pub(super) struct UnavailableStore;

impl KeyValueStore for UnavailableStore {
    fn get(&self, _key: &str) -> Result<Option<Value>, StoreError> {
        Err(StoreError::Unavailable("backing store offline".to_string()))
    }

    fn set(&self, _key: &str, _value: Value) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("backing store offline".to_string()))
    }

    fn remove(&self, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("backing store offline".to_string()))
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Err(StoreError::Unavailable("backing store offline".to_string()))
    }
}

/// Serves reads from a seeded memory store but rejects every write.
#[derive(Default)]
pub(super) struct ReadOnlyStore {
    pub(super) inner: MemoryKeyValueStore,
}

impl KeyValueStore for ReadOnlyStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        self.inner.get(key)
    }

    fn set(&self, _key: &str, _value: Value) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("quota exceeded".to_string()))
    }

    fn remove(&self, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("quota exceeded".to_string()))
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        self.inner.keys()
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
