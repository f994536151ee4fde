//! Cinefind Search - title search and enrichment
//!
//! Turns a raw, possibly partial or misspelled query into fully detailed movie
//! records. Searches run against an OMDb-style service in two phases (summary
//! search, then one detail lookup per hit), with staged fallback queries for
//! partial titles and session-tagged pagination for the primary flow.

#![deny(missing_docs)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![warn(clippy::too_many_lines)]

pub mod enrichment;
pub mod errors;
pub mod fallback;
pub mod fetcher;
pub mod matcher;
pub mod pagination;
pub mod providers;
pub mod service;
pub mod types;

// Re-export main types
pub use enrichment::ResultEnricher;
pub use errors::MovieSearchError;
pub use fallback::{FallbackPhase, FallbackSearch, PhaseTrigger};
pub use fetcher::{DetailFetcher, SearchFetcher};
pub use matcher::{PartialTitleMatcher, TitleFilter};
pub use pagination::{PaginationController, SearchSession, SessionToken};
pub use providers::{MovieApi, OmdbProvider};
pub use service::MovieSearchService;
pub use types::{FetchOutcome, PageResult, SearchPage, SearchReport, SearchStrategy, SearchSummary};

/// Convenience type alias for Results with MovieSearchError.
pub type Result<T> = std::result::Result<T, MovieSearchError>;
