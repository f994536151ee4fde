//! Local persistence for selected movie records.
//!
//! Defines the storage interface consumed by the search layer with an in-memory
//! implementation and a JSON file-backed implementation.

pub mod file_storage;
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
pub use file_storage::JsonFileStore;
pub use memory::MemoryMovieStore;
use serde::{Deserialize, Serialize};

use crate::movie::MovieRecord;

/// A persisted movie with its save timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMovie {
    /// The record as it was validated at save time
    pub record: MovieRecord,
    /// When the record was last written
    pub saved_at: DateTime<Utc>,
}

impl StoredMovie {
    /// Stamps a record with the current time.
    pub fn now(record: MovieRecord) -> Self {
        Self {
            record,
            saved_at: Utc::now(),
        }
    }
}

/// Storage operations for saved movie records.
///
/// Identifiers are unique; writing an existing identifier replaces it.
#[async_trait]
pub trait MovieStore: Send + Sync + std::fmt::Debug {
    /// Validates and inserts a record, replacing any record with the same id.
    ///
    /// # Errors
    ///
    /// - `StorageError::InvalidRecord` - If the record fails validation
    /// - `StorageError::Io` - If the backing file could not be written
    async fn upsert(&self, record: MovieRecord) -> Result<StoredMovie, StorageError>;

    /// Looks up a record by identifier.
    ///
    /// # Errors
    ///
    /// - `StorageError::Io` - If the backing file could not be read
    async fn get(&self, imdb_id: &str) -> Result<Option<StoredMovie>, StorageError>;

    /// Returns records whose cast contains `actor` (case-insensitive substring).
    ///
    /// # Errors
    ///
    /// - `StorageError::Io` - If the backing file could not be read
    async fn find_by_actor(&self, actor: &str) -> Result<Vec<StoredMovie>, StorageError>;

    /// Returns every stored record ordered by identifier.
    ///
    /// # Errors
    ///
    /// - `StorageError::Io` - If the backing file could not be read
    async fn list(&self) -> Result<Vec<StoredMovie>, StorageError>;
}

/// Errors that occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Record rejected before it reached the store
    #[error("Invalid record: {reason}")]
    InvalidRecord {
        /// Why validation failed
        reason: String,
    },

    /// Backing file exists but is not a valid store document
    #[error("Corrupt store file: {reason}")]
    Corrupt {
        /// Decoder message
        reason: String,
    },

    /// Standard I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
