use crate::repository::{KeyValueStore, StorageError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Key-value store backed by one JSON file per key in a directory.
///
/// The local-disk analog of the browser storage this engine was designed to
/// sit on. Keys are sanitized into file names, so `keys()` reports the
/// sanitized form; the well-known keys survive sanitization unchanged.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Opens a store rooted at `root`, creating the directory when missing.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` when the directory cannot be created.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| StorageError::Io(e.to_string()))?;
        Ok(Self { root })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let sanitized: String = key
            .chars()
            .map(|ch| {
                if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
                    ch
                } else {
                    '_'
                }
            })
            .collect();
        self.root.join(format!("{sanitized}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError::Io(err.to_string())),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::write(self.path_for(key), value).map_err(|e| StorageError::Io(e.to_string()))
    }

    fn remove(&self, key: &str) -> Result<bool, StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(StorageError::Io(err.to_string())),
        }
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let mut keys = Vec::new();
        let entries = fs::read_dir(&self.root).map_err(|e| StorageError::Io(e.to_string()))?;
        for entry in entries {
            let entry = entry.map_err(|e| StorageError::Io(e.to_string()))?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_survive_reopening_the_store() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FileStore::new(dir.path()).unwrap();
            store.put("current-session", "{\"a\":1}").unwrap();
        }
        let store = FileStore::new(dir.path()).unwrap();
        assert_eq!(
            store.get("current-session").unwrap().as_deref(),
            Some("{\"a\":1}")
        );
    }

    #[test]
    fn missing_key_reads_as_none_and_removes_as_false() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        assert_eq!(store.get("nothing").unwrap(), None);
        assert!(!store.remove("nothing").unwrap());
    }

    #[test]
    fn keys_list_the_sanitized_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        store.put("custom-questions", "[]").unwrap();
        store.put("weird key!", "x").unwrap();
        assert_eq!(
            store.keys().unwrap(),
            vec!["custom-questions", "weird_key_"]
        );
    }

    #[test]
    fn remove_deletes_the_backing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        store.put("current-session", "{}").unwrap();
        assert!(store.remove("current-session").unwrap());
        assert_eq!(store.get("current-session").unwrap(), None);
    }
}
