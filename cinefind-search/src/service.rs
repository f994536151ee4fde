//! Movie search service wiring the pipeline together.
//!
//! One entry point for presentation code: fallback search for partial titles,
//! paginated search for the primary flow, and saving selected movies.

use std::sync::Arc;

use cinefind_core::config::SearchConfig;
use cinefind_core::{CinefindConfig, MovieRecord, MovieStore, StoredMovie};

use crate::enrichment::ResultEnricher;
use crate::errors::MovieSearchError;
use crate::fallback::FallbackSearch;
use crate::fetcher::{DetailFetcher, SearchFetcher};
use crate::matcher::PartialTitleMatcher;
use crate::pagination::{PaginationController, SearchSession};
use crate::providers::{MovieApi, OmdbProvider};
use crate::types::{FetchOutcome, PageResult, SearchReport};

/// Search service over one remote movie database.
#[derive(Debug)]
pub struct MovieSearchService {
    detail: DetailFetcher,
    matcher: PartialTitleMatcher,
    fallback: FallbackSearch,
    pagination: PaginationController,
}

impl MovieSearchService {
    /// Creates a service backed by OMDb.
    ///
    /// # Errors
    /// - `MovieSearchError::Network` - If the HTTP client could not be built
    pub fn new(config: &CinefindConfig) -> Result<Self, MovieSearchError> {
        let provider = OmdbProvider::new(&config.api)?;
        Ok(Self::with_provider(Arc::new(provider), &config.search))
    }

    /// Creates a service over any provider.
    pub fn with_provider(api: Arc<dyn MovieApi>, config: &SearchConfig) -> Self {
        let search = SearchFetcher::new(api.clone());
        let detail = DetailFetcher::new(api);
        let enricher = ResultEnricher::new(detail.clone(), config.detail_concurrency);
        let matcher =
            PartialTitleMatcher::new(search.clone(), enricher.clone(), config.similarity_threshold);

        Self {
            detail,
            fallback: FallbackSearch::new(matcher.clone(), config),
            pagination: PaginationController::new(search, enricher, config.page_size),
            matcher,
        }
    }

    /// Staged search for partial or misspelled titles.
    pub async fn search_with_fallback(&self, query: &str) -> SearchReport {
        self.fallback.search_with_fallback(query).await
    }

    /// One filtered search pass without fallback phases.
    ///
    /// Blank input returns no records without contacting the service.
    pub async fn match_partial_title(&self, term: &str, raw_query: &str) -> Vec<MovieRecord> {
        self.matcher.match_partial_title(term, raw_query).await
    }

    /// Starts a paginated search.
    ///
    /// # Errors
    /// - `MovieSearchError::EmptyQuery` - Query was blank
    /// - `MovieSearchError::Superseded` - A newer search started before this one finished
    pub async fn new_search(&self, query: &str) -> Result<PageResult, MovieSearchError> {
        self.pagination.new_search(query).await
    }

    /// Loads the next page of the current paginated search.
    ///
    /// # Errors
    /// - `MovieSearchError::NoActiveSession` - No search has been started
    /// - `MovieSearchError::LoadInProgress` - Another page is still loading
    /// - `MovieSearchError::NoMorePages` - All pages already loaded
    /// - `MovieSearchError::Superseded` - A newer search replaced the session
    pub async fn load_more(&self) -> Result<PageResult, MovieSearchError> {
        self.pagination.load_more().await
    }

    /// Current paginated session, if any.
    pub async fn session(&self) -> Option<SearchSession> {
        self.pagination.snapshot().await
    }

    /// Fetches one record; failures come back as a sentinel record.
    pub async fn fetch_detail(&self, imdb_id: &str) -> FetchOutcome<MovieRecord> {
        self.detail.fetch_detail(imdb_id).await
    }

    /// Fetches a movie and persists it into `store`.
    ///
    /// # Errors
    /// - `MovieSearchError::EmptyQuery` - Identifier was blank
    /// - `MovieSearchError::Storage` - Lookup failed or the store rejected the record
    pub async fn save_movie(
        &self,
        imdb_id: &str,
        store: &dyn MovieStore,
    ) -> Result<StoredMovie, MovieSearchError> {
        let imdb_id = imdb_id.trim();
        if imdb_id.is_empty() {
            return Err(MovieSearchError::EmptyQuery);
        }

        let record = self.detail.fetch_detail(imdb_id).await.into_value();
        let stored = store.upsert(record).await?;
        tracing::info!("Saved '{}' ({})", stored.record.title, stored.record.imdb_id);
        Ok(stored)
    }
}
