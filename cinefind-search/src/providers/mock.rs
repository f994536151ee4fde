//! Scripted in-memory movie database for tests.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use cinefind_core::MovieRecord;
use parking_lot::Mutex;

use super::MovieApi;
use crate::errors::MovieSearchError;
use crate::types::{SearchPage, SearchSummary};

/// Mock provider answering from scripted pages and details.
///
/// Unscripted searches return an empty page. Details are synthesized from any
/// scripted summary with the same id unless an explicit record was registered.
/// Every call is recorded in order.
#[derive(Debug, Default)]
pub struct MockMovieApi {
    pages: HashMap<(String, u32), SearchPage>,
    details: HashMap<String, MovieRecord>,
    known_summaries: HashMap<String, SearchSummary>,
    failing_details: HashSet<String>,
    failing_searches: HashSet<String>,
    panicking_searches: HashSet<String>,
    delays: HashMap<String, Duration>,
    transient_failures: Mutex<HashMap<(String, u32), u32>>,
    search_calls: Mutex<Vec<(String, u32)>>,
    detail_calls: Mutex<Vec<String>>,
}

impl MockMovieApi {
    /// Creates a mock with nothing scripted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts page `page` of `query`.
    pub fn with_page(
        mut self,
        query: &str,
        page: u32,
        summaries: Vec<SearchSummary>,
        total_results: u32,
    ) -> Self {
        for summary in &summaries {
            self.known_summaries
                .insert(summary.imdb_id.clone(), summary.clone());
        }
        self.pages.insert(
            (query.to_string(), page),
            SearchPage {
                summaries,
                total_results,
            },
        );
        self
    }

    /// Registers an explicit detail record.
    pub fn with_detail(mut self, record: MovieRecord) -> Self {
        self.details.insert(record.imdb_id.clone(), record);
        self
    }

    /// Makes detail lookups for `imdb_id` fail with a network error.
    pub fn with_failing_detail(mut self, imdb_id: &str) -> Self {
        self.failing_details.insert(imdb_id.to_string());
        self
    }

    /// Makes searches for `query` fail with a provider error.
    pub fn with_failing_search(mut self, query: &str) -> Self {
        self.failing_searches.insert(query.to_string());
        self
    }

    /// Makes searches for `query` panic.
    pub fn with_panicking_search(mut self, query: &str) -> Self {
        self.panicking_searches.insert(query.to_string());
        self
    }

    /// Makes the next `failures` searches for page `page` of `query` fail with
    /// a network error; later searches answer normally.
    pub fn with_transient_search_failure(self, query: &str, page: u32, failures: u32) -> Self {
        self.transient_failures
            .lock()
            .insert((query.to_string(), page), failures);
        self
    }

    /// Delays every search for `query`.
    pub fn with_delay(mut self, query: &str, delay: Duration) -> Self {
        self.delays.insert(query.to_string(), delay);
        self
    }

    /// Searches issued so far as `(query, page)`.
    pub fn search_calls(&self) -> Vec<(String, u32)> {
        self.search_calls.lock().clone()
    }

    /// Search terms issued so far, page numbers dropped.
    pub fn searched_terms(&self) -> Vec<String> {
        self.search_calls
            .lock()
            .iter()
            .map(|(query, _)| query.clone())
            .collect()
    }

    /// Detail ids requested so far.
    pub fn detail_calls(&self) -> Vec<String> {
        self.detail_calls.lock().clone()
    }

    fn synthesize_detail(summary: &SearchSummary) -> MovieRecord {
        MovieRecord {
            title: summary.title.clone(),
            year: summary.year.clone(),
            plot: format!("Plot of {}", summary.title),
            actors: "Mock Actor".to_string(),
            media_type: "movie".to_string(),
            ..MovieRecord::unknown(summary.imdb_id.clone())
        }
    }
}

#[async_trait]
impl MovieApi for MockMovieApi {
    async fn search_page(&self, query: &str, page: u32) -> Result<SearchPage, MovieSearchError> {
        self.search_calls.lock().push((query.to_string(), page));

        if let Some(delay) = self.delays.get(query) {
            tokio::time::sleep(*delay).await;
        }

        if self.panicking_searches.contains(query) {
            panic!("mock search exploded for '{query}'");
        }

        if self.failing_searches.contains(query) {
            return Err(MovieSearchError::Provider {
                reason: "Invalid API key!".to_string(),
            });
        }

        let fails_now = {
            let mut failures = self.transient_failures.lock();
            match failures.get_mut(&(query.to_string(), page)) {
                Some(remaining) if *remaining > 0 => {
                    *remaining -= 1;
                    true
                }
                _ => false,
            }
        };
        if fails_now {
            return Err(MovieSearchError::Network {
                reason: format!("timed out loading page {page} of '{query}'"),
            });
        }

        Ok(self
            .pages
            .get(&(query.to_string(), page))
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_detail(&self, imdb_id: &str) -> Result<MovieRecord, MovieSearchError> {
        self.detail_calls.lock().push(imdb_id.to_string());

        if self.failing_details.contains(imdb_id) {
            return Err(MovieSearchError::Network {
                reason: format!("connection reset fetching {imdb_id}"),
            });
        }

        if let Some(record) = self.details.get(imdb_id) {
            return Ok(record.clone());
        }

        match self.known_summaries.get(imdb_id) {
            Some(summary) => Ok(Self::synthesize_detail(summary)),
            None => Err(MovieSearchError::Provider {
                reason: "Incorrect IMDb ID.".to_string(),
            }),
        }
    }
}
