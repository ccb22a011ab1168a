//! Key-value storage adapter contract and backends
//!
//! The adapter is the seam to the platform's namespaced key-value store.
//! No atomicity is assumed across keys: a multi-key operation may partially
//! fail and callers must tolerate the documented orphan states.

use crate::error::{Result, StorageError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::fs;
use tokio::sync::Mutex;
use ulid::Ulid;

/// Contract for the namespaced key-value store backing prompt records
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value under a key, `None` if absent
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value under a key, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key; removing an absent key is not an error
    async fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory backend. Values are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

/// File-backed key-value store, one file per key.
///
/// Writes go to a temp file first and are renamed into place, so a reader
/// never observes a torn value for a single key.
#[derive(Debug)]
pub struct FileKeyValueStore {
    base_dir: PathBuf,
}

impl FileKeyValueStore {
    /// Create a store rooted at the given directory
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Map a key to its file path. `:` is not portable in filenames.
    fn key_path(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c == ':' { '_' } else { c })
            .collect();
        self.base_dir.join(format!("{name}.json"))
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.key_path(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.base_dir).await?;
        let tmp = self.base_dir.join(format!(".tmp_{}", Ulid::new()));
        fs::write(&tmp, value).await?;
        fs::rename(&tmp, self.key_path(key)).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.key_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryKeyValueStore::new();

        assert_eq!(store.get("missing").await.unwrap(), None);

        store.set("key", "value").await.unwrap();
        assert_eq!(store.get("key").await.unwrap().as_deref(), Some("value"));

        store.set("key", "replaced").await.unwrap();
        assert_eq!(store.get("key").await.unwrap().as_deref(), Some("replaced"));

        store.remove("key").await.unwrap();
        assert_eq!(store.get("key").await.unwrap(), None);

        // Removing an absent key is fine
        store.remove("key").await.unwrap();
    }

    #[tokio::test]
    async fn test_file_store_roundtrip() {
        let temp_dir = tempdir().unwrap();
        let store = FileKeyValueStore::new(temp_dir.path().to_path_buf());

        assert_eq!(store.get("prompt:abc").await.unwrap(), None);

        store.set("prompt:abc", "{\"id\":\"abc\"}").await.unwrap();
        assert_eq!(
            store.get("prompt:abc").await.unwrap().as_deref(),
            Some("{\"id\":\"abc\"}")
        );

        store.remove("prompt:abc").await.unwrap();
        assert_eq!(store.get("prompt:abc").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_store_keys_do_not_collide() {
        let temp_dir = tempdir().unwrap();
        let store = FileKeyValueStore::new(temp_dir.path().to_path_buf());

        store.set("prompts_index", "[]").await.unwrap();
        store.set("prompt:1", "a").await.unwrap();
        store.set("prompt:2", "b").await.unwrap();

        assert_eq!(store.get("prompts_index").await.unwrap().as_deref(), Some("[]"));
        assert_eq!(store.get("prompt:1").await.unwrap().as_deref(), Some("a"));
        assert_eq!(store.get("prompt:2").await.unwrap().as_deref(), Some("b"));
    }
}
