//! JSON file-backed movie store

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;

use super::{MovieStore, StorageError, StoredMovie};
use crate::movie::MovieRecord;

/// On-disk document layout.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    movies: BTreeMap<String, StoredMovie>,
}

/// File system-based store keeping every record in one JSON document.
///
/// Writes go to a sibling temp file which is then renamed over the original,
/// so readers never observe a half-written document. A missing file reads as
/// an empty store.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Creates a store backed by `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Location of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<StoreDocument, StorageError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(StoreDocument::default());
            }
            Err(e) => return Err(e.into()),
        };

        serde_json::from_slice(&bytes).map_err(|e| StorageError::Corrupt {
            reason: e.to_string(),
        })
    }

    async fn persist(&self, document: &StoreDocument) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }

        let bytes = serde_json::to_vec_pretty(document).map_err(|e| StorageError::Corrupt {
            reason: e.to_string(),
        })?;

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, bytes).await?;
        fs::rename(&temp_path, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl MovieStore for JsonFileStore {
    async fn upsert(&self, record: MovieRecord) -> Result<StoredMovie, StorageError> {
        record.validate()?;

        let _guard = self.write_lock.lock().await;
        let mut document = self.load().await?;
        let stored = StoredMovie::now(record);
        document
            .movies
            .insert(stored.record.imdb_id.clone(), stored.clone());
        self.persist(&document).await?;

        tracing::debug!(
            "Saved {} to {}",
            stored.record.imdb_id,
            self.path.display()
        );
        Ok(stored)
    }

    async fn get(&self, imdb_id: &str) -> Result<Option<StoredMovie>, StorageError> {
        Ok(self.load().await?.movies.remove(imdb_id))
    }

    async fn find_by_actor(&self, actor: &str) -> Result<Vec<StoredMovie>, StorageError> {
        Ok(self
            .load()
            .await?
            .movies
            .into_values()
            .filter(|stored| stored.record.has_cast_member(actor))
            .collect())
    }

    async fn list(&self) -> Result<Vec<StoredMovie>, StorageError> {
        Ok(self.load().await?.movies.into_values().collect())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::movie::test_fixtures::sample_record;

    #[tokio::test]
    async fn test_missing_file_is_empty_store() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("movies.json"));

        assert!(store.list().await.unwrap().is_empty());
        assert!(store.get("tt0133093").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_records_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("movies.json");

        let store = JsonFileStore::new(&path);
        store
            .upsert(sample_record("tt0113277", "Heat", "Al Pacino, Robert De Niro"))
            .await
            .unwrap();
        store
            .upsert(sample_record("tt0113277", "Heat (1995)", "Al Pacino, Robert De Niro"))
            .await
            .unwrap();

        let reopened = JsonFileStore::new(&path);
        let all = reopened.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].record.title, "Heat (1995)");
        assert_eq!(reopened.find_by_actor("de niro").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_file_reported() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("movies.json");
        std::fs::write(&path, b"not json").unwrap();

        let store = JsonFileStore::new(&path);

        assert!(matches!(
            store.list().await,
            Err(StorageError::Corrupt { .. })
        ));
    }
}
