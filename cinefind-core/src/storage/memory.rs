//! In-memory movie store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{MovieStore, StorageError, StoredMovie};
use crate::movie::MovieRecord;

/// Volatile store keyed by identifier. Used by tests and one-shot sessions.
#[derive(Debug, Default)]
pub struct MemoryMovieStore {
    records: RwLock<BTreeMap<String, StoredMovie>>,
}

impl MemoryMovieStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// True when nothing has been saved.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl MovieStore for MemoryMovieStore {
    async fn upsert(&self, record: MovieRecord) -> Result<StoredMovie, StorageError> {
        record.validate()?;
        let stored = StoredMovie::now(record);
        self.records
            .write()
            .insert(stored.record.imdb_id.clone(), stored.clone());
        Ok(stored)
    }

    async fn get(&self, imdb_id: &str) -> Result<Option<StoredMovie>, StorageError> {
        Ok(self.records.read().get(imdb_id).cloned())
    }

    async fn find_by_actor(&self, actor: &str) -> Result<Vec<StoredMovie>, StorageError> {
        Ok(self
            .records
            .read()
            .values()
            .filter(|stored| stored.record.has_cast_member(actor))
            .cloned()
            .collect())
    }

    async fn list(&self) -> Result<Vec<StoredMovie>, StorageError> {
        Ok(self.records.read().values().cloned().collect())
    }
}
