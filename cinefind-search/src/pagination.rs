//! Paginated primary search with "load more" accumulation.
//!
//! The controller owns at most one live session. Each session is tagged with a
//! monotonically increasing token; a response that arrives after a newer search
//! replaced its session is discarded instead of overwriting newer results.
//! Fetches for the same session are mutually exclusive: a `load_more` issued
//! while another fetch is outstanding is rejected.
//!
//! This flow applies no client-side title filter; it relies on the remote
//! service's own relevance.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use cinefind_core::MovieRecord;
use parking_lot::Mutex;
use tokio::sync::Mutex as AsyncMutex;

use crate::enrichment::ResultEnricher;
use crate::errors::MovieSearchError;
use crate::fetcher::SearchFetcher;
use crate::types::{FetchOutcome, PageResult};

/// Identifies one search session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionToken(u64);

impl SessionToken {
    /// Raw token value, for logs.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Accumulated state of one paginated search.
#[derive(Debug, Clone)]
pub struct SearchSession {
    token: SessionToken,
    query: String,
    page: u32,
    items: Vec<MovieRecord>,
    total_results: u32,
}

impl SearchSession {
    fn new(token: SessionToken, query: &str) -> Self {
        Self {
            token,
            query: query.to_string(),
            page: 0,
            items: Vec::new(),
            total_results: 0,
        }
    }

    /// Token issued when the session started.
    pub fn token(&self) -> SessionToken {
        self.token
    }

    /// Trimmed query of the session.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Last page fetched, 1-based.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Every record loaded so far, in page order. Duplicates are not pruned.
    pub fn items(&self) -> &[MovieRecord] {
        &self.items
    }

    /// Remote total reported by the first page.
    pub fn total_results(&self) -> u32 {
        self.total_results
    }

    /// True while the remote total extends past the pages already fetched.
    pub fn has_more(&self, page_size: u32) -> bool {
        u64::from(self.page) * u64::from(page_size) < u64::from(self.total_results)
    }
}

#[derive(Debug, Clone)]
struct CurrentSession {
    token: SessionToken,
    query: String,
    session: Arc<AsyncMutex<SearchSession>>,
}

/// Drives the paginated flow: `new_search` then any number of `load_more`.
#[derive(Debug)]
pub struct PaginationController {
    search: SearchFetcher,
    enricher: ResultEnricher,
    page_size: u32,
    last_token: AtomicU64,
    current: Mutex<Option<CurrentSession>>,
}

impl PaginationController {
    /// Creates a controller with no session; `page_size` is the remote page length.
    pub fn new(search: SearchFetcher, enricher: ResultEnricher, page_size: u32) -> Self {
        Self {
            search,
            enricher,
            page_size: page_size.max(1),
            last_token: AtomicU64::new(0),
            current: Mutex::new(None),
        }
    }

    /// Starts a new session for `query` and loads its first page.
    ///
    /// Any previous session is abandoned; its in-flight responses will be
    /// discarded.
    ///
    /// # Errors
    /// - `MovieSearchError::EmptyQuery` - Query was blank; no call was made
    /// - `MovieSearchError::Superseded` - A newer search started before this one finished
    pub async fn new_search(&self, query: &str) -> Result<PageResult, MovieSearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(MovieSearchError::EmptyQuery);
        }

        let token = SessionToken(self.last_token.fetch_add(1, Ordering::SeqCst) + 1);
        let session = Arc::new(AsyncMutex::new(SearchSession::new(token, query)));
        let mut guard = session.clone().lock_owned().await;
        *self.current.lock() = Some(CurrentSession {
            token,
            query: query.to_string(),
            session,
        });
        tracing::debug!("Session {} started for '{}'", token.as_u64(), query);

        let result = self.fetch_page(query, 1).await.into_value();
        self.ensure_current(token, query)?;

        guard.page = 1;
        guard.total_results = result.total_results;
        guard.items = result.items.clone();

        Ok(result)
    }

    /// Fetches the next page of the current session and appends it.
    ///
    /// A failed fetch is absorbed: the result is empty, carries the last
    /// delivered page number and leaves the session untouched, so the next call
    /// asks for the same page again.
    ///
    /// # Errors
    /// - `MovieSearchError::NoActiveSession` - No search has been started
    /// - `MovieSearchError::LoadInProgress` - Another fetch for this session is outstanding
    /// - `MovieSearchError::NoMorePages` - The remote total is exhausted
    /// - `MovieSearchError::Superseded` - A newer search started while this page was loading
    pub async fn load_more(&self) -> Result<PageResult, MovieSearchError> {
        let current = self
            .current
            .lock()
            .clone()
            .ok_or(MovieSearchError::NoActiveSession)?;

        let mut guard = current
            .session
            .clone()
            .try_lock_owned()
            .map_err(|_| MovieSearchError::LoadInProgress {
                query: current.query.clone(),
            })?;

        if !guard.has_more(self.page_size) {
            return Err(MovieSearchError::NoMorePages {
                query: current.query.clone(),
                total_results: guard.total_results,
            });
        }

        let next_page = guard.page + 1;
        let outcome = self.fetch_page(&current.query, next_page).await;
        self.ensure_current(current.token, &current.query)?;

        let result = match outcome {
            FetchOutcome::Fetched(result) => result,
            FetchOutcome::Absorbed { reason, .. } => {
                tracing::debug!(
                    "Session {} keeps page {}; page {} will be retried: {}",
                    current.token.as_u64(),
                    guard.page,
                    next_page,
                    reason
                );
                return Ok(PageResult {
                    items: Vec::new(),
                    page: guard.page,
                    total_results: guard.total_results,
                });
            }
        };

        guard.page = next_page;
        guard.items.extend(result.items.iter().cloned());
        tracing::debug!(
            "Session {} now holds {} of {} results",
            current.token.as_u64(),
            guard.items.len(),
            guard.total_results
        );

        Ok(PageResult {
            total_results: guard.total_results,
            ..result
        })
    }

    /// Copy of the current session, waiting for any in-flight fetch to finish.
    pub async fn snapshot(&self) -> Option<SearchSession> {
        let current = self.current.lock().clone()?;
        let session = current.session.lock().await;
        Some(session.clone())
    }

    /// Accumulated records of the current session.
    pub async fn session_items(&self) -> Vec<MovieRecord> {
        self.snapshot()
            .await
            .map(|session| session.items)
            .unwrap_or_default()
    }

    /// Query of the current session, if any.
    pub fn current_query(&self) -> Option<String> {
        self.current.lock().as_ref().map(|current| current.query.clone())
    }

    async fn fetch_page(&self, query: &str, page: u32) -> FetchOutcome<PageResult> {
        match self.search.search(query, page).await {
            FetchOutcome::Fetched(found) => FetchOutcome::Fetched(PageResult {
                items: self.enricher.enrich(&found.summaries).await,
                page,
                total_results: found.total_results,
            }),
            FetchOutcome::Absorbed { value, reason } => FetchOutcome::Absorbed {
                value: PageResult {
                    items: Vec::new(),
                    page,
                    total_results: value.total_results,
                },
                reason,
            },
        }
    }

    fn ensure_current(&self, token: SessionToken, query: &str) -> Result<(), MovieSearchError> {
        let is_current = self
            .current
            .lock()
            .as_ref()
            .is_some_and(|current| current.token == token);

        if is_current {
            Ok(())
        } else {
            tracing::debug!(
                "Dropping late response for session {} ('{}')",
                token.as_u64(),
                query
            );
            Err(MovieSearchError::Superseded {
                query: query.to_string(),
            })
        }
    }
}
