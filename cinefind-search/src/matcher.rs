//! Single-pass partial title search with client-side filtering.
//!
//! The remote search is loose; filtering its first page against the user's own
//! words tightens precision without a second round trip.

use cinefind_core::MovieRecord;
use strsim::normalized_levenshtein;

use crate::enrichment::ResultEnricher;
use crate::fetcher::SearchFetcher;
use crate::types::{SearchSummary, WILDCARD};

/// Decides whether a remote title matches what the user typed.
///
/// A title matches when its lowercased form contains the filter key, or when
/// some run of title words as long as the key is within
/// `similarity_threshold` normalized Levenshtein similarity of it. The second
/// test lets prefix retries recover misspelled queries.
#[derive(Debug, Clone)]
pub struct TitleFilter {
    key: String,
    key_words: usize,
    similarity_threshold: f64,
}

impl TitleFilter {
    /// Builds the filter key: lowercased, wildcard markers stripped.
    pub fn new(raw_query: &str, similarity_threshold: f64) -> Self {
        let key = raw_query
            .to_lowercase()
            .replace(WILDCARD, "")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        let key_words = key.split_whitespace().count();

        Self {
            key,
            key_words,
            similarity_threshold: similarity_threshold.clamp(0.0, 1.0),
        }
    }

    /// Normalized text titles are compared against; empty for blank input.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// True when `title` contains the key or a word window is close enough to it.
    pub fn matches(&self, title: &str) -> bool {
        let title = title.to_lowercase();
        if title.contains(&self.key) {
            return true;
        }
        if self.key_words == 0 {
            return false;
        }

        let words: Vec<&str> = title.split_whitespace().collect();
        if words.len() <= self.key_words {
            return normalized_levenshtein(&words.join(" "), &self.key) >= self.similarity_threshold;
        }

        words
            .windows(self.key_words)
            .any(|window| normalized_levenshtein(&window.join(" "), &self.key) >= self.similarity_threshold)
    }

    /// Keeps matching summaries in their original order.
    pub fn retain(&self, summaries: Vec<SearchSummary>) -> Vec<SearchSummary> {
        summaries
            .into_iter()
            .filter(|summary| self.matches(&summary.title))
            .collect()
    }
}

/// Runs one search, filters the first page and enriches what survives.
#[derive(Debug, Clone)]
pub struct PartialTitleMatcher {
    search: SearchFetcher,
    enricher: ResultEnricher,
    similarity_threshold: f64,
}

impl PartialTitleMatcher {
    /// Creates a matcher; `similarity_threshold` feeds every [`TitleFilter`] it builds.
    pub fn new(search: SearchFetcher, enricher: ResultEnricher, similarity_threshold: f64) -> Self {
        Self {
            search,
            enricher,
            similarity_threshold,
        }
    }

    /// Searches for `term` and keeps titles matching `raw_query_for_filter`.
    ///
    /// A blank term or a filter key with nothing left after normalization
    /// yields no results and no remote call. An empty remote page returns
    /// immediately without detail calls.
    pub async fn match_partial_title(
        &self,
        term: &str,
        raw_query_for_filter: &str,
    ) -> Vec<MovieRecord> {
        let term = term.trim();
        let filter = TitleFilter::new(raw_query_for_filter, self.similarity_threshold);
        if term.is_empty() || filter.key().is_empty() {
            tracing::debug!("Skipping blank title match: term '{}', key '{}'", term, filter.key());
            return Vec::new();
        }

        let page = self.search.search(term, 1).await.into_value();
        if page.is_empty() {
            return Vec::new();
        }

        let found = page.summaries.len();
        let retained = filter.retain(page.summaries);

        tracing::debug!(
            "Term '{}': kept {} of {} titles matching '{}'",
            term,
            retained.len(),
            found,
            filter.key()
        );

        self.enricher.enrich(&retained).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::fetcher::DetailFetcher;
    use crate::providers::MockMovieApi;

    fn matcher_for(api: MockMovieApi) -> (PartialTitleMatcher, Arc<MockMovieApi>) {
        let api = Arc::new(api);
        let matcher = PartialTitleMatcher::new(
            SearchFetcher::new(api.clone()),
            ResultEnricher::new(DetailFetcher::new(api.clone()), 4),
            0.8,
        );
        (matcher, api)
    }

    #[test]
    fn test_filter_key_normalization() {
        assert_eq!(TitleFilter::new("  MATRIX*  ", 0.8).key(), "matrix");
        assert_eq!(TitleFilter::new("The  God*father", 0.8).key(), "the godfather");
    }

    #[test]
    fn test_filter_substring_and_typo_tolerance() {
        let filter = TitleFilter::new("Matrix", 0.8);
        assert!(filter.matches("The Matrix"));
        assert!(filter.matches("Matrix Reloaded"));
        assert!(!filter.matches("Speed"));

        let typo = TitleFilter::new("godfther", 0.8);
        assert!(typo.matches("The Godfather"));
        assert!(!typo.matches("Goodfellas"));
    }

    #[tokio::test]
    async fn test_wildcard_term_filters_by_raw_query() {
        let (matcher, api) = matcher_for(MockMovieApi::new().with_page(
            "Matrix*",
            1,
            vec![
                SearchSummary::new("tt0133093", "The Matrix", "1999"),
                SearchSummary::new("tt0234215", "Matrix Reloaded", "2003"),
                SearchSummary::new("tt0111257", "Speed", "1994"),
            ],
            3,
        ));

        let records = matcher.match_partial_title("Matrix*", "Matrix").await;

        let titles: Vec<_> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["The Matrix", "Matrix Reloaded"]);
        assert_eq!(api.detail_calls(), vec!["tt0133093", "tt0234215"]);
    }

    #[tokio::test]
    async fn test_empty_search_skips_detail_calls() {
        let (matcher, api) = matcher_for(MockMovieApi::new());

        assert!(matcher.match_partial_title("nothing", "nothing").await.is_empty());
        assert_eq!(api.search_calls().len(), 1);
        assert!(api.detail_calls().is_empty());
    }

    #[tokio::test]
    async fn test_all_filtered_out_makes_no_detail_calls() {
        let (matcher, api) = matcher_for(MockMovieApi::new().with_page(
            "alien",
            1,
            vec![SearchSummary::new("tt0111257", "Speed", "1994")],
            1,
        ));

        assert!(matcher.match_partial_title("alien", "alien").await.is_empty());
        assert!(api.detail_calls().is_empty());
    }

    #[tokio::test]
    async fn test_blank_inputs_make_no_calls() {
        let (matcher, api) = matcher_for(MockMovieApi::new().with_page(
            "   ",
            1,
            vec![SearchSummary::new("tt0133093", "The Matrix", "1999")],
            1,
        ));

        assert!(matcher.match_partial_title("   ", "   ").await.is_empty());
        assert!(matcher.match_partial_title("matrix", " ** ").await.is_empty());
        assert!(matcher.match_partial_title("\t", "matrix").await.is_empty());
        assert!(api.search_calls().is_empty());
        assert!(api.detail_calls().is_empty());
    }
}
