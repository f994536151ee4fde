//! Error types for movie search functionality.

use cinefind_core::StorageError;
use thiserror::Error;

/// Errors that can occur during movie search operations.
///
/// Remote failures (`Network`, `HttpStatus`, `Parse`, `Provider`) are produced by
/// providers and absorbed by the fetchers; they never reach presentation code.
#[derive(Debug, Error)]
pub enum MovieSearchError {
    /// Query was blank; rejected before any network call.
    #[error("Please enter a movie title to search")]
    EmptyQuery,

    /// Network communication error occurred during a request.
    #[error("Network error: {reason}")]
    Network {
        /// The reason for the network error
        reason: String,
    },

    /// Remote service answered with a non-success status.
    #[error("HTTP {status} from movie service")]
    HttpStatus {
        /// Status code returned
        status: u16,
    },

    /// Failed to parse response data.
    #[error("Parse error: {reason}")]
    Parse {
        /// The reason for the parse error
        reason: String,
    },

    /// Remote service reported an error in its body.
    #[error("Provider error: {reason}")]
    Provider {
        /// Message supplied by the service
        reason: String,
    },

    /// A page fetch for the current session is already outstanding.
    #[error("A page load is already in progress for '{query}'")]
    LoadInProgress {
        /// Query of the busy session
        query: String,
    },

    /// `load_more` called before any search.
    #[error("No active search to load more results for")]
    NoActiveSession,

    /// Every page of the current session has been fetched.
    #[error("All {total_results} results for '{query}' already loaded")]
    NoMorePages {
        /// Query of the exhausted session
        query: String,
        /// Remote total
        total_results: u32,
    },

    /// A newer search replaced this session while its response was in flight.
    #[error("Results for '{query}' discarded: a newer search replaced it")]
    Superseded {
        /// Query whose response arrived late
        query: String,
    },

    /// Movie could not be persisted.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl MovieSearchError {
    /// True for failures that come from the remote service or transport.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            MovieSearchError::Network { .. }
                | MovieSearchError::HttpStatus { .. }
                | MovieSearchError::Parse { .. }
                | MovieSearchError::Provider { .. }
        )
    }
}
