use std::sync::Arc;

use ahash::AHashSet as HashSet;
use futures::future::{join_all, try_join_all};
use socialspot_data::{DataError, Document, DocumentStore, Item, ItemKind, Page, RangeQuery, normalize_documents};
use tracing::{info, instrument, warn};

use super::Result;
use crate::geo::GeohashBound;

/// Document field holding the stored geohash.
pub const GEOHASH_FIELD: &str = "location.geohash";

/// What to do when some bound queries fail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FetchPolicy {
    /// Any failed bound fails the whole fetch.
    #[default]
    FailFast,
    /// Return what the successful bounds produced and flag the result as
    /// degraded. Fails only when every bound fails.
    Degraded,
}

#[derive(Debug, Clone, Default)]
pub struct FetchOutcome {
    /// Deduplicated candidates in bound order, then store order.
    pub items: Vec<Arc<Item>>,
    /// `true` when at least one bound query failed.
    pub degraded: bool,
    pub failed_bounds: usize,
    /// Bounds that returned exactly `max_per_bound` documents.
    pub truncated_bounds: usize,
}

/// Fan-out of one range query per geohash bound, merged into a candidate list.
#[derive(Debug, Clone)]
pub struct CandidateFetcher {
    pub kind: ItemKind,
    pub collection: String,
    pub max_per_bound: usize,
    pub policy: FetchPolicy,
}

impl CandidateFetcher {
    pub fn new(kind: ItemKind, max_per_bound: usize) -> Self {
        Self {
            kind,
            collection: kind.collection().to_string(),
            max_per_bound,
            policy: FetchPolicy::default(),
        }
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn with_policy(mut self, policy: FetchPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn query_for(&self, bound: &GeohashBound) -> RangeQuery {
        RangeQuery::between(
            self.collection.as_str(),
            GEOHASH_FIELD,
            bound.lower.as_str(),
            bound.upper.as_str(),
            self.max_per_bound,
        )
    }

    /// Query every bound concurrently and merge the pages.
    ///
    /// All queries complete (or the fetch fails) before anything is returned.
    /// Documents are deduplicated by id, first occurrence wins.
    #[instrument(name = "Fetch Candidates", level = "info", skip_all, fields(collection = %self.collection, bounds = bounds.len()))]
    pub async fn fetch<S>(&self, store: &S, bounds: &[GeohashBound]) -> Result<FetchOutcome>
    where
        S: DocumentStore + ?Sized,
    {
        let queries: Vec<RangeQuery> = bounds.iter().map(|b| self.query_for(b)).collect();
        let requests = queries.iter().map(|q| store.range_query(q));

        let results: Vec<socialspot_data::Result<Page>> = match self.policy {
            FetchPolicy::FailFast => try_join_all(requests).await?.into_iter().map(Ok).collect(),
            FetchPolicy::Degraded => join_all(requests).await,
        };

        let mut seen = HashSet::new();
        let mut documents: Vec<Document> = Vec::new();
        let mut first_error: Option<DataError> = None;
        let mut outcome = FetchOutcome::default();

        for (bound, result) in bounds.iter().zip(results) {
            match result {
                Ok(page) => {
                    if page.len() >= self.max_per_bound {
                        outcome.truncated_bounds += 1;
                        warn!(
                            lower = %bound.lower,
                            upper = %bound.upper,
                            limit = self.max_per_bound,
                            "Bound returned a full page, candidates may be truncated"
                        );
                    }
                    documents.extend(page.documents.into_iter().filter(|doc| seen.insert(doc.id.clone())));
                }
                Err(e) => {
                    warn!(lower = %bound.lower, upper = %bound.upper, error = %e, "Bound query failed");
                    outcome.failed_bounds += 1;
                    first_error.get_or_insert(e);
                }
            }
        }

        if let Some(e) = first_error {
            if outcome.failed_bounds == bounds.len() {
                return Err(e.into());
            }
            outcome.degraded = true;
            warn!(
                failed = outcome.failed_bounds,
                total = bounds.len(),
                "Returning degraded candidate set"
            );
        }

        outcome.items = normalize_documents(self.kind, &documents)
            .into_iter()
            .map(Arc::new)
            .collect();
        info!(candidates = outcome.items.len(), "Fetched candidates");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::json;
    use socialspot_data::MemoryStore;

    use super::*;
    use crate::search::SearchError;

    fn doc(id: &str, geohash: &str) -> Document {
        Document::new(
            id,
            json!({"name": id, "location": {"geohash": geohash, "coordinates": {"latitude": 38.9, "longitude": -76.5}}}),
        )
    }

    fn bound(lower: &str, upper: &str) -> GeohashBound {
        GeohashBound {
            lower: lower.into(),
            upper: upper.into(),
        }
    }

    fn ids(outcome: &FetchOutcome) -> Vec<&str> {
        outcome.items.iter().map(|i| i.id.as_str()).collect()
    }

    /// Store failing every query whose lower bound starts with `prefix`.
    struct FlakyStore {
        inner: MemoryStore,
        prefix: &'static str,
    }

    #[async_trait]
    impl DocumentStore for FlakyStore {
        async fn range_query(&self, query: &RangeQuery) -> socialspot_data::Result<Page> {
            if query.lower.as_deref().is_some_and(|l| l.starts_with(self.prefix)) {
                return Err(DataError::query_failure(&query.collection, "unavailable"));
            }
            self.inner.range_query(query).await
        }
    }

    fn store() -> MemoryStore {
        MemoryStore::from_documents(
            "activities",
            vec![doc("a", "dqcte1"), doc("b", "dqctf2"), doc("c", "dqcw00"), doc("d", "9zzzzz")],
        )
    }

    #[tokio::test]
    async fn test_merges_and_dedups_overlapping_bounds() {
        let fetcher = CandidateFetcher::new(ItemKind::Activity, 100);
        let bounds = [bound("dqct", "dqcu"), bound("dqctf", "dqctg"), bound("dqcw", "dqcx")];
        let outcome = fetcher.fetch(&store(), &bounds).await.unwrap();
        assert_eq!(ids(&outcome), ["a", "b", "c"]);
        assert!(!outcome.degraded);
    }

    #[tokio::test]
    async fn test_queries_run_concurrently() {
        let store = store().with_latency(Duration::from_millis(100));
        let fetcher = CandidateFetcher::new(ItemKind::Activity, 100);
        let bounds: Vec<_> = (0..8).map(|_| bound("dqct", "dqcu")).collect();
        let started = std::time::Instant::now();
        fetcher.fetch(&store, &bounds).await.unwrap();
        assert!(started.elapsed() < Duration::from_millis(600));
        assert_eq!(store.query_count(), 8);
    }

    #[tokio::test]
    async fn test_fail_fast_policy() {
        let store = FlakyStore {
            inner: store(),
            prefix: "dqcw",
        };
        let fetcher = CandidateFetcher::new(ItemKind::Activity, 100);
        let result = fetcher.fetch(&store, &[bound("dqct", "dqcu"), bound("dqcw", "dqcx")]).await;
        assert!(matches!(
            result,
            Err(SearchError::Data(DataError::QueryFailure { .. }))
        ));
    }

    #[tokio::test]
    async fn test_degraded_policy_returns_partial_union() {
        let store = FlakyStore {
            inner: store(),
            prefix: "dqcw",
        };
        let fetcher = CandidateFetcher::new(ItemKind::Activity, 100).with_policy(FetchPolicy::Degraded);
        let outcome = fetcher
            .fetch(&store, &[bound("dqct", "dqcu"), bound("dqcw", "dqcx")])
            .await
            .unwrap();
        assert_eq!(ids(&outcome), ["a", "b"]);
        assert!(outcome.degraded);
        assert_eq!(outcome.failed_bounds, 1);

        let all_failed = fetcher.fetch(&store, &[bound("dqcw", "dqcx")]).await;
        assert!(all_failed.is_err());
    }

    #[tokio::test]
    async fn test_full_page_is_flagged_as_truncated() {
        let fetcher = CandidateFetcher::new(ItemKind::Activity, 2);
        let outcome = fetcher.fetch(&store(), &[bound("dqct", "dqcx")]).await.unwrap();
        assert_eq!(ids(&outcome), ["a", "b"]);
        assert_eq!(outcome.truncated_bounds, 1);
    }

    #[tokio::test]
    async fn test_no_bounds_no_queries() {
        let store = store();
        let outcome = CandidateFetcher::new(ItemKind::Activity, 10)
            .fetch(&store, &[])
            .await
            .unwrap();
        assert!(outcome.items.is_empty());
        assert_eq!(store.query_count(), 0);
    }
}
