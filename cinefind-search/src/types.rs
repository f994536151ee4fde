//! Data types for movie search functionality.

use std::fmt;

use cinefind_core::MovieRecord;
use serde::{Deserialize, Serialize};

/// One row of a remote search page. Never surfaced without enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSummary {
    /// External identifier used for the detail lookup
    pub imdb_id: String,
    /// Title as listed by the search endpoint
    pub title: String,
    /// Release year as listed
    pub year: String,
}

impl SearchSummary {
    /// Creates a summary row.
    pub fn new(
        imdb_id: impl Into<String>,
        title: impl Into<String>,
        year: impl Into<String>,
    ) -> Self {
        Self {
            imdb_id: imdb_id.into(),
            title: title.into(),
            year: year.into(),
        }
    }
}

/// One page of search results plus the remote total.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPage {
    /// Rows of this page, in remote order
    pub summaries: Vec<SearchSummary>,
    /// Total matches across all pages
    pub total_results: u32,
}

impl SearchPage {
    /// The "no results" page. Also what every absorbed failure turns into.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when the page carries no rows.
    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }
}

/// Result of a fail-soft fetch.
///
/// Failures are absorbed into a usable fallback value; the reason is kept so
/// logs and tests can tell the two apart.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    /// Remote call succeeded
    Fetched(T),
    /// Remote call failed; `value` is the fallback
    Absorbed {
        /// Fallback value standing in for the failed result
        value: T,
        /// Display form of the absorbed error
        reason: String,
    },
}

impl<T> FetchOutcome<T> {
    /// Consumes the outcome, returning the value either way.
    pub fn into_value(self) -> T {
        match self {
            FetchOutcome::Fetched(value) | FetchOutcome::Absorbed { value, .. } => value,
        }
    }

    /// Borrows the value either way.
    pub fn value(&self) -> &T {
        match self {
            FetchOutcome::Fetched(value) | FetchOutcome::Absorbed { value, .. } => value,
        }
    }

    /// True when the remote call failed.
    pub fn is_absorbed(&self) -> bool {
        matches!(self, FetchOutcome::Absorbed { .. })
    }
}

/// Query transformation applied by one fallback phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStrategy {
    /// Query as typed
    Direct,
    /// Query with a trailing wildcard marker
    Wildcard,
    /// Query with a leading prefix; the empty prefix repeats the direct query
    Prefix(&'static str),
}

impl SearchStrategy {
    /// Remote search term this strategy issues for `query`.
    pub fn apply(&self, query: &str) -> String {
        match self {
            SearchStrategy::Direct => query.to_string(),
            SearchStrategy::Wildcard => format!("{query}{WILDCARD}"),
            SearchStrategy::Prefix(prefix) => format!("{prefix}{query}"),
        }
    }
}

impl fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchStrategy::Direct => write!(f, "direct"),
            SearchStrategy::Wildcard => write!(f, "wildcard"),
            SearchStrategy::Prefix("") => write!(f, "prefix(none)"),
            SearchStrategy::Prefix(prefix) => write!(f, "prefix({})", prefix.trim_end()),
        }
    }
}

/// Wildcard marker appended by [`SearchStrategy::Wildcard`].
pub const WILDCARD: char = '*';

/// Outward result of the fallback search.
///
/// Exactly one of `results` and `error_message` is non-empty.
#[derive(Debug, Clone, Default)]
pub struct SearchReport {
    /// Enriched matches of the winning phase
    pub results: Vec<MovieRecord>,
    /// User-facing message; empty on success
    pub error_message: String,
    /// Strategies attempted, in order
    pub attempts: Vec<SearchStrategy>,
}

impl SearchReport {
    /// Report for a phase that produced results.
    pub fn success(results: Vec<MovieRecord>, attempts: Vec<SearchStrategy>) -> Self {
        Self {
            results,
            error_message: String::new(),
            attempts,
        }
    }

    /// Report carrying only a message.
    pub fn failure(message: impl Into<String>, attempts: Vec<SearchStrategy>) -> Self {
        Self {
            results: Vec::new(),
            error_message: message.into(),
            attempts,
        }
    }

    /// True when no error message was set.
    pub fn is_success(&self) -> bool {
        self.error_message.is_empty()
    }
}

/// One fetched page of the paginated flow.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult {
    /// Enriched records of this page only
    pub items: Vec<MovieRecord>,
    /// 1-based page number
    pub page: u32,
    /// Remote total reported by the first page
    pub total_results: u32,
}
