use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Key holding the serialized snapshot of the session in flight.
pub const CURRENT_SESSION_KEY: &str = "current-session";
/// Key holding the serialized list of user-authored questions.
pub const CUSTOM_QUESTIONS_KEY: &str = "custom-questions";

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("lock poisoned: {0}")]
    Lock(String),
}

/// Synchronous key-value persistence contract.
///
/// Every operation runs to completion on the calling thread; retries,
/// timeouts, and scheduling are the caller's business. Values are opaque
/// strings, JSON by convention.
pub trait KeyValueStore: Send + Sync {
    /// Fetch the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the backend cannot be read at all; a
    /// missing key is `Ok(None)`, not an error.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the value cannot be written.
    fn put(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`, reporting whether it existed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the backend cannot be written; removing a
    /// missing key is `Ok(false)`.
    fn remove(&self, key: &str) -> Result<bool, StorageError>;

    /// All keys currently present, in sorted order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the backend cannot be enumerated.
    fn keys(&self) -> Result<Vec<String>, StorageError>;
}

/// Simple in-memory store for tests and prototyping.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        Ok(guard.remove(key).is_some())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        let mut keys: Vec<String> = guard.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
