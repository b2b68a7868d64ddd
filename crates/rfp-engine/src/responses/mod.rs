//! Vendor response lifecycle: persistence, status transitions, autosave and progress.

pub mod autosave;
pub mod domain;
pub mod lifecycle;
pub mod progress;
pub mod repository;
pub mod router;
pub mod store;

#[cfg(test)]
mod tests;

pub use autosave::{AutoSaveCoordinator, DebounceScheduler};
pub use domain::{
    is_empty_value, ResponseKey, ResponseRecord, ResponseStatus, ResponseValue, SubjectId,
};
pub use lifecycle::{classify_edit, next_status, EditState, LifecycleError, ResponseLifecycleManager};
pub use progress::ProgressStats;
pub use repository::{
    clear_all, responses_key, GlobalAnswerMap, GlobalAnswerStore, ResponseMap, ResponseStore,
    GLOBAL_ANSWERS_KEY, RESPONSES_KEY_PREFIX,
};
pub use router::{response_router, AnswerPayload};
pub use store::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, StoreError};
