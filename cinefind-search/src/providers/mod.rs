//! Remote movie database providers.

use async_trait::async_trait;
use cinefind_core::MovieRecord;

use crate::errors::MovieSearchError;
use crate::types::SearchPage;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod omdb;

#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockMovieApi;
pub use omdb::OmdbProvider;

/// Trait for remote movie databases.
///
/// Implementations report every failure as an error. Absorbing those errors
/// into empty results is the fetchers' job, not the provider's.
#[async_trait]
pub trait MovieApi: Send + Sync + std::fmt::Debug {
    /// Fetches one page of summary results for `query`.
    ///
    /// # Errors
    /// - `MovieSearchError::Network` - Transport failure
    /// - `MovieSearchError::HttpStatus` - Non-success status
    /// - `MovieSearchError::Parse` - Malformed body
    /// - `MovieSearchError::Provider` - Service reported an error
    async fn search_page(&self, query: &str, page: u32) -> Result<SearchPage, MovieSearchError>;

    /// Fetches the full record for one identifier.
    ///
    /// # Errors
    /// - `MovieSearchError::Network` - Transport failure
    /// - `MovieSearchError::HttpStatus` - Non-success status
    /// - `MovieSearchError::Parse` - Malformed body
    /// - `MovieSearchError::Provider` - Service reported an error
    async fn fetch_detail(&self, imdb_id: &str) -> Result<MovieRecord, MovieSearchError>;
}
