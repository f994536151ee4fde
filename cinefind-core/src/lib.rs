//! Cinefind Core - shared building blocks
//!
//! Provides the movie record model, configuration, tracing setup and the local
//! store that persists movies selected from search results.

#![deny(missing_docs)]

pub mod config;
pub mod movie;
pub mod storage;
pub mod tracing_setup;

// Re-export main types for convenient access
pub use config::CinefindConfig;
pub use movie::{MovieRecord, UNKNOWN};
pub use storage::{JsonFileStore, MemoryMovieStore, MovieStore, StorageError, StoredMovie};

/// Core errors that can bubble up from configuration and storage.
#[derive(Debug, thiserror::Error)]
pub enum CinefindError {
    /// Saved-movie store failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Invalid or unusable configuration
    #[error("Configuration error: {reason}")]
    Configuration {
        /// What was wrong
        reason: String,
    },

    /// Standard I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CinefindError {
    /// Returns a user-friendly error message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            CinefindError::Storage(StorageError::InvalidRecord { reason }) => {
                format!("Movie cannot be saved: {reason}")
            }
            CinefindError::Storage(_) => "Saved movies could not be accessed".to_string(),
            CinefindError::Configuration { reason } => format!("Configuration error: {reason}"),
            CinefindError::Io(_) => "File system error occurred".to_string(),
        }
    }

    /// Checks if this error is due to user input validation.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            CinefindError::Configuration { .. }
                | CinefindError::Storage(StorageError::InvalidRecord { .. })
        )
    }
}

/// Convenience type alias for Results with CinefindError.
pub type Result<T> = std::result::Result<T, CinefindError>;
