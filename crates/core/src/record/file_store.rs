//! File-based record storage
//!
//! Stores a collection as a pretty-printed JSON array in a file on disk.

use async_trait::async_trait;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::{Record, RecordStore};
use crate::{Error, Result};

/// JSON file store for one collection
pub struct JsonFileStore<T> {
    /// Path to the JSON file
    path: PathBuf,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> JsonFileStore<T> {
    /// Create a new JsonFileStore
    ///
    /// If the file doesn't exist, it will be created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file the next snapshot is written to before it is renamed
    /// over `path`
    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| T::KIND.to_lowercase());
        self.path
            .with_file_name(format!(".{}.{:016x}.tmp", name, rand::random::<u64>()))
    }

    /// Write `initial` if the backing file does not exist yet.
    ///
    /// Returns `true` when the file was created.
    pub async fn ensure_initialized(&self, initial: &[T]) -> Result<bool> {
        if tokio::fs::try_exists(&self.path).await? {
            return Ok(false);
        }
        self.save_all(initial).await?;
        Ok(true)
    }
}

#[async_trait]
impl<T: Record> RecordStore<T> for JsonFileStore<T> {
    async fn load_all(&self) -> Vec<T> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("{} file {:?} does not exist yet", T::KIND, self.path);
                return Vec::new();
            }
            Err(e) => {
                warn!("Failed to read {} file {:?}: {}", T::KIND, self.path, e);
                return Vec::new();
            }
        };

        if content.trim().is_empty() {
            return Vec::new();
        }

        match serde_json::from_str(&content) {
            Ok(records) => records,
            Err(e) => {
                warn!(
                    "Failed to parse {} file {:?}, treating it as empty: {}",
                    T::KIND,
                    self.path,
                    e
                );
                Vec::new()
            }
        }
    }

    async fn save_all(&self, records: &[T]) -> Result<()> {
        let content = serde_json::to_string_pretty(records)?;

        // Ensure parent directory exists
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                Error::Storage(format!("Failed to create {:?}: {}", parent, e))
            })?;
        }

        // Readers only ever see the old or the new array, never a truncated file
        let temp_path = self.temp_path();
        if let Err(e) = tokio::fs::write(&temp_path, content).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(Error::Storage(format!(
                "Failed to write {:?}: {}",
                temp_path, e
            )));
        }

        if let Err(e) = tokio::fs::rename(&temp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(Error::Storage(format!(
                "Failed to replace {:?}: {}",
                self.path, e
            )));
        }
        debug!("Saved {} {} records to {:?}", records.len(), T::KIND, self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use tempfile::TempDir;

    fn create_test_store() -> (JsonFileStore<Category>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("categories.json"));
        (store, temp_dir)
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let (store, _temp) = create_test_store();
        assert!(store.load_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_unparsable_file_loads_empty() {
        let (store, _temp) = create_test_store();
        tokio::fs::write(store.path(), "{ not json").await.unwrap();

        assert!(store.load_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let (store, _temp) = create_test_store();
        let categories = vec![
            Category::new(1, "Work", "#3b82f6"),
            Category::new(2, "Home", "#10b981"),
        ];

        store.save_all(&categories).await.unwrap();
        let loaded = store.load_all().await;

        assert_eq!(loaded, categories);
    }

    #[tokio::test]
    async fn test_save_writes_human_readable_array() {
        let (store, _temp) = create_test_store();
        store
            .save_all(&[Category::new(7, "Errands", "#f59e0b")])
            .await
            .unwrap();

        let content = tokio::fs::read_to_string(store.path()).await.unwrap();
        assert!(content.starts_with('['));
        assert!(content.contains('\n'));
        assert!(content.contains("\"name\": \"Errands\""));
    }

    #[tokio::test]
    async fn test_save_replaces_whole_collection() {
        let (store, _temp) = create_test_store();
        store
            .save_all(&[Category::new(1, "Work", "#3b82f6")])
            .await
            .unwrap();
        store.save_all(&[]).await.unwrap();

        assert!(store.load_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_save_creates_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let store: JsonFileStore<Category> =
            JsonFileStore::new(temp_dir.path().join("nested").join("categories.json"));

        store
            .save_all(&[Category::new(1, "Work", "#3b82f6")])
            .await
            .unwrap();
        assert_eq!(store.load_all().await.len(), 1);
    }

    #[tokio::test]
    async fn test_write_failure_is_storage_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("occupied");
        std::fs::create_dir(&path).unwrap();
        let store: JsonFileStore<Category> = JsonFileStore::new(&path);

        let result = store.save_all(&[]).await;
        match result.unwrap_err() {
            Error::Storage(msg) => assert!(msg.contains("Failed to replace")),
            e => panic!("Expected Storage error, got: {:?}", e),
        }

        // The snapshot written next to the target is cleaned up
        let leftovers: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from("occupied")]);
    }

    #[tokio::test]
    async fn test_save_leaves_no_temp_files() {
        let (store, temp) = create_test_store();
        for id in 1..=3 {
            store
                .save_all(&[Category::new(id, "Work", "#3b82f6")])
                .await
                .unwrap();
        }

        let names: Vec<_> = std::fs::read_dir(temp.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("categories.json")]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_readers_never_see_partial_writes() {
        let (store, _temp) = create_test_store();
        let store = std::sync::Arc::new(store);
        let seeded: Vec<Category> = (1..=300)
            .map(|id| Category::new(id, format!("Category {}", id), "#3b82f6"))
            .collect();
        store.save_all(&seeded).await.unwrap();

        let writer = {
            let store = store.clone();
            let mut records = seeded.clone();
            tokio::spawn(async move {
                for id in 301..=400 {
                    records.push(Category::new(id, format!("Category {}", id), "#10b981"));
                    store.save_all(&records).await.unwrap();
                }
            })
        };

        while !writer.is_finished() {
            let seen = store.load_all().await.len();
            assert!(seen >= 300, "reader saw {} records", seen);
            tokio::task::yield_now().await;
        }
        writer.await.unwrap();
        assert_eq!(store.load_all().await.len(), 400);
    }

    #[tokio::test]
    async fn test_ensure_initialized_only_writes_once() {
        let (store, _temp) = create_test_store();

        let created = store
            .ensure_initialized(&[Category::new(1, "Work", "#3b82f6")])
            .await
            .unwrap();
        assert!(created);

        let created_again = store.ensure_initialized(&[]).await.unwrap();
        assert!(!created_again);
        assert_eq!(store.load_all().await.len(), 1);
    }
}
