#![forbid(unsafe_code)]

pub mod custom;
pub mod export;
pub mod file_store;
pub mod repository;
pub mod snapshot;

pub use custom::{load_custom_questions, save_custom_questions};
pub use export::{ImportIssue, ProgressStatistics, UserProgress, merge_entries};
pub use file_store::FileStore;
pub use repository::{
    CURRENT_SESSION_KEY, CUSTOM_QUESTIONS_KEY, KeyValueStore, MemoryStore, StorageError,
};
pub use snapshot::{SessionSnapshot, clear_session, load_session, save_session};
