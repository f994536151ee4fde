//! Turns search summaries into fully detailed records.

use cinefind_core::MovieRecord;
use futures::stream::{self, StreamExt};

use crate::fetcher::DetailFetcher;
use crate::types::SearchSummary;

/// Issues one detail lookup per summary, up to `concurrency` at a time.
///
/// Output order always matches input order. A failed lookup yields a sentinel
/// record in its slot without affecting its siblings. No deduplication.
#[derive(Debug, Clone)]
pub struct ResultEnricher {
    detail: DetailFetcher,
    concurrency: usize,
}

impl ResultEnricher {
    /// Creates an enricher running at most `concurrency` lookups at once.
    ///
    /// Zero is treated as one.
    pub fn new(detail: DetailFetcher, concurrency: usize) -> Self {
        Self {
            detail,
            concurrency: concurrency.max(1),
        }
    }

    /// Returns one record per summary, in input order.
    pub async fn enrich(&self, summaries: &[SearchSummary]) -> Vec<MovieRecord> {
        if summaries.is_empty() {
            return Vec::new();
        }

        let detail = &self.detail;
        let records: Vec<MovieRecord> = stream::iter(summaries)
            .map(|summary| detail.fetch_detail(&summary.imdb_id))
            .buffered(self.concurrency)
            .map(|outcome| outcome.into_value())
            .collect()
            .await;

        tracing::debug!("Enriched {} summaries", records.len());
        records
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use proptest::prelude::*;

    use super::*;
    use crate::providers::MockMovieApi;

    fn summaries(ids: &[&str]) -> Vec<SearchSummary> {
        ids.iter()
            .map(|id| SearchSummary::new(*id, format!("Title {id}"), "2000"))
            .collect()
    }

    fn enricher_for(api: MockMovieApi, concurrency: usize) -> (ResultEnricher, Arc<MockMovieApi>) {
        let api = Arc::new(api);
        let enricher = ResultEnricher::new(DetailFetcher::new(api.clone()), concurrency);
        (enricher, api)
    }

    #[tokio::test]
    async fn test_empty_input_makes_no_calls() {
        let (enricher, api) = enricher_for(MockMovieApi::new(), 4);

        assert!(enricher.enrich(&[]).await.is_empty());
        assert!(api.detail_calls().is_empty());
    }

    #[tokio::test]
    async fn test_single_failure_is_isolated() {
        let batch = summaries(&["tt1", "tt2", "tt3", "tt4"]);
        let mut api = MockMovieApi::new().with_page("q", 1, batch.clone(), 4);
        api = api.with_failing_detail("tt3");
        let (enricher, _) = enricher_for(api, 2);

        let records = enricher.enrich(&batch).await;

        assert_eq!(records.len(), 4);
        let unknown: Vec<_> = records.iter().filter(|r| r.is_unknown()).collect();
        assert_eq!(unknown.len(), 1);
        assert_eq!(unknown[0].imdb_id, "tt3");
        assert_eq!(records[0].title, "Title tt1");
        assert_eq!(records[3].title, "Title tt4");
    }

    #[tokio::test]
    async fn test_duplicates_are_kept() {
        let batch = summaries(&["tt1", "tt1"]);
        let (enricher, api) = enricher_for(MockMovieApi::new().with_page("q", 1, batch.clone(), 2), 1);

        let records = enricher.enrich(&batch).await;

        assert_eq!(records.len(), 2);
        assert_eq!(api.detail_calls().len(), 2);
    }

    proptest! {
        #[test]
        fn prop_enrich_preserves_order(
            ids in prop::collection::vec("tt[0-9]{3}", 0..12),
            failing in prop::collection::vec(any::<bool>(), 12),
            concurrency in 1usize..6,
        ) {
            let batch: Vec<SearchSummary> = ids
                .iter()
                .map(|id| SearchSummary::new(id.clone(), format!("Title {id}"), "2000"))
                .collect();

            let mut api = MockMovieApi::new().with_page("q", 1, batch.clone(), batch.len() as u32);
            for (id, fail) in ids.iter().zip(failing.iter()) {
                if *fail {
                    api = api.with_failing_detail(id);
                }
            }
            let (enricher, _) = enricher_for(api, concurrency);

            let records = tokio_test::block_on(enricher.enrich(&batch));

            prop_assert_eq!(records.len(), batch.len());
            for (record, summary) in records.iter().zip(batch.iter()) {
                prop_assert_eq!(&record.imdb_id, &summary.imdb_id);
            }
        }
    }
}
