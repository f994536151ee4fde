//! Fail-soft fetchers over a [`MovieApi`].
//!
//! This is the boundary where remote failures stop: a failed search becomes an
//! empty page, a failed detail becomes a sentinel record.

use std::sync::Arc;

use cinefind_core::MovieRecord;

use crate::providers::MovieApi;
use crate::types::{FetchOutcome, SearchPage};

/// Retrieves one page of summaries.
#[derive(Debug, Clone)]
pub struct SearchFetcher {
    api: Arc<dyn MovieApi>,
}

impl SearchFetcher {
    /// Wraps `api` for summary searches.
    pub fn new(api: Arc<dyn MovieApi>) -> Self {
        Self { api }
    }

    /// Fetches page `page` (1-based) of `query`.
    ///
    /// Any remote failure is absorbed into an empty page with a zero total.
    pub async fn search(&self, query: &str, page: u32) -> FetchOutcome<SearchPage> {
        let page = page.max(1);

        match self.api.search_page(query, page).await {
            Ok(result) => {
                tracing::debug!(
                    "Search '{}' page {}: {} summaries of {}",
                    query,
                    page,
                    result.summaries.len(),
                    result.total_results
                );
                FetchOutcome::Fetched(result)
            }
            Err(e) => {
                tracing::warn!("Search '{}' page {} absorbed: {}", query, page, e);
                FetchOutcome::Absorbed {
                    value: SearchPage::empty(),
                    reason: e.to_string(),
                }
            }
        }
    }
}

/// Retrieves one fully detailed record.
#[derive(Debug, Clone)]
pub struct DetailFetcher {
    api: Arc<dyn MovieApi>,
}

impl DetailFetcher {
    /// Wraps `api` for detail lookups.
    pub fn new(api: Arc<dyn MovieApi>) -> Self {
        Self { api }
    }

    /// Fetches the record for `imdb_id`.
    ///
    /// On failure the record carries the requested id and the unknown sentinel
    /// everywhere else, so one bad id cannot abort a batch.
    pub async fn fetch_detail(&self, imdb_id: &str) -> FetchOutcome<MovieRecord> {
        match self.api.fetch_detail(imdb_id).await {
            Ok(record) => FetchOutcome::Fetched(record),
            Err(e) => {
                tracing::warn!("Detail {} absorbed: {}", imdb_id, e);
                FetchOutcome::Absorbed {
                    value: MovieRecord::unknown(imdb_id),
                    reason: e.to_string(),
                }
            }
        }
    }
}
