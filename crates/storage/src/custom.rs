use crate::repository::{CUSTOM_QUESTIONS_KEY, KeyValueStore, StorageError};
use drill_core::model::CustomQuestion;

/// Writes the whole custom-question list under the well-known key.
///
/// # Errors
///
/// Returns `StorageError` when encoding or the write fails.
pub fn save_custom_questions(
    store: &dyn KeyValueStore,
    questions: &[CustomQuestion],
) -> Result<(), StorageError> {
    let payload = serde_json::to_string(questions)
        .map_err(|e| StorageError::Serialization(e.to_string()))?;
    store.put(CUSTOM_QUESTIONS_KEY, &payload)
}

/// Reads the custom-question list, tolerating corruption.
///
/// A missing key yields an empty list. An unparseable payload also yields an
/// empty list: the stale key is removed and the incident logged, so one bad
/// write never wedges question authoring.
///
/// # Errors
///
/// Returns `StorageError` only when the backend itself cannot be accessed.
pub fn load_custom_questions(
    store: &dyn KeyValueStore,
) -> Result<Vec<CustomQuestion>, StorageError> {
    let Some(raw) = store.get(CUSTOM_QUESTIONS_KEY)? else {
        return Ok(Vec::new());
    };
    match serde_json::from_str(&raw) {
        Ok(questions) => Ok(questions),
        Err(err) => {
            tracing::warn!(error = %err, "discarding unreadable custom questions");
            store.remove(CUSTOM_QUESTIONS_KEY)?;
            Ok(Vec::new())
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
