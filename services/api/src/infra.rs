use metrics_exporter_prometheus::PrometheusHandle;
use rfp_engine::catalog::QuestionCatalog;
use rfp_engine::comparison::ComparisonRegistry;
use rfp_engine::config::AppConfig;
use rfp_engine::error::AppError;
use rfp_engine::responses::{
    AutoSaveCoordinator, FileKeyValueStore, KeyValueStore, MemoryKeyValueStore,
    ResponseLifecycleManager, StoreError,
};
use serde_json::Value;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Backend chosen at startup: a JSON file when a store path is configured, memory otherwise.
pub(crate) enum ConfiguredStore {
    Memory(MemoryKeyValueStore),
    File(FileKeyValueStore),
}

impl ConfiguredStore {
    pub(crate) fn open(path: Option<&Path>) -> Result<Self, AppError> {
        match path {
            Some(path) => Ok(Self::File(FileKeyValueStore::open(path)?)),
            None => Ok(Self::Memory(MemoryKeyValueStore::default())),
        }
    }

    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Memory(_) => "memory".to_string(),
            Self::File(store) => format!("file:{}", store.path().display()),
        }
    }
}

impl KeyValueStore for ConfiguredStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        match self {
            Self::Memory(store) => store.get(key),
            Self::File(store) => store.get(key),
        }
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        match self {
            Self::Memory(store) => store.set(key, value),
            Self::File(store) => store.set(key, value),
        }
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match self {
            Self::Memory(store) => store.remove(key),
            Self::File(store) => store.remove(key),
        }
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        match self {
            Self::Memory(store) => store.keys(),
            Self::File(store) => store.keys(),
        }
    }
}

/// Shared services behind the HTTP routers.
pub(crate) struct Engine {
    pub(crate) autosave: Arc<AutoSaveCoordinator<ConfiguredStore>>,
    pub(crate) comparisons: Arc<ComparisonRegistry>,
    pub(crate) store_description: String,
}

impl Engine {
    pub(crate) fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let store = ConfiguredStore::open(config.storage.store_path.as_deref())?;
        Ok(Self::with_store(store, config.autosave.quiet_period()))
    }

    pub(crate) fn with_store(store: ConfiguredStore, quiet_period: std::time::Duration) -> Self {
        let store_description = store.describe();
        let catalog = Arc::new(QuestionCatalog::standard());
        let manager = Arc::new(ResponseLifecycleManager::new(
            Arc::new(store),
            Arc::clone(&catalog),
        ));
        Self {
            autosave: Arc::new(AutoSaveCoordinator::new(manager, quiet_period)),
            comparisons: Arc::new(ComparisonRegistry::new(catalog)),
            store_description,
        }
    }
}
