//! Per-screen search orchestration and result state.
//!
//! The coordinator owns the candidate set, runs the pipeline on every query
//! change and exposes the current results plus a loading/error state.
//! Concurrent searches are ordered by a monotonic request sequence number: a
//! result is applied only if no newer request has already applied one.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use chrono::{Local, NaiveDate};
use parking_lot::Mutex;
use socialspot_data::{
    Coordinate, DocumentStore, Item, LocationError, LocationProvider, ZipResolver, load_catalog,
};
use tracing::{debug, info, instrument, warn};

use crate::{
    config::{CoordinatorConfig, SearchMode},
    error::Result,
    geo::{miles_to_meters, query_bounds_with_precision},
    search::{
        CandidateFetcher, LocationRequest, ResolvedLocation, SearchHit, SearchQuery, SearchError,
        resolve_location, run_pipeline, unique_categories, unique_event_types,
    },
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchState {
    #[default]
    Idle,
    Loading,
    Ready,
    /// The last request failed; results are the last-known-good set.
    Error,
}

/// Point-in-time view of the coordinator for the UI layer.
#[derive(Debug, Clone)]
pub struct SearchSnapshot {
    pub state: SearchState,
    pub results: Arc<Vec<SearchHit>>,
    /// Query that produced `results`.
    pub query: SearchQuery,
    pub error: Option<String>,
    /// Results came from a fetch where some bound queries failed.
    pub degraded: bool,
    /// Sequence number of the request whose outcome is shown.
    pub sequence: u64,
}

type Candidates = Arc<Vec<Arc<Item>>>;
type GeoKey = (Coordinate, f64);
type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

#[derive(Debug, Default)]
struct Inner {
    state: SearchState,
    catalog: Option<Candidates>,
    geo_candidates: Option<(GeoKey, Candidates, bool)>,
    results: Arc<Vec<SearchHit>>,
    query: SearchQuery,
    error: Option<String>,
    degraded: bool,
    applied: u64,
}

impl Inner {
    fn snapshot(&self) -> SearchSnapshot {
        SearchSnapshot {
            state: self.state,
            results: Arc::clone(&self.results),
            query: self.query.clone(),
            error: self.error.clone(),
            degraded: self.degraded,
            sequence: self.applied,
        }
    }
}

/// Where a search takes its candidates from.
enum Source {
    Catalog,
    Geo(GeoKey),
}

pub struct SearchCoordinator<S> {
    store: S,
    config: CoordinatorConfig,
    zips: ZipResolver,
    location: Option<Arc<dyn LocationProvider>>,
    clock: Clock,
    sequence: AtomicU64,
    inner: Mutex<Inner>,
}

impl<S> std::fmt::Debug for SearchCoordinator<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchCoordinator")
            .field("config", &self.config)
            .field("sequence", &self.sequence)
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl<S: DocumentStore> SearchCoordinator<S> {
    pub fn new(store: S, config: CoordinatorConfig) -> Self {
        Self {
            store,
            config,
            zips: ZipResolver::new(),
            location: None,
            clock: Arc::new(|| Local::now().date_naive()),
            sequence: AtomicU64::new(0),
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn with_zip_resolver(mut self, zips: ZipResolver) -> Self {
        self.zips = zips;
        self
    }

    pub fn with_location_provider(mut self, provider: Arc<dyn LocationProvider>) -> Self {
        self.location = Some(provider);
        self
    }

    /// Replace the source of "today" used by the event date window.
    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDate + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        self.inner.lock().snapshot()
    }

    pub fn state(&self) -> SearchState {
        self.inner.lock().state
    }

    pub fn results(&self) -> Arc<Vec<SearchHit>> {
        Arc::clone(&self.inner.lock().results)
    }

    /// Display categories present in the candidates currently held.
    pub fn categories(&self) -> Vec<String> {
        self.held_candidates()
            .map(|c| unique_categories(&c))
            .unwrap_or_default()
    }

    pub fn event_types(&self) -> Vec<String> {
        self.held_candidates()
            .map(|c| unique_event_types(&c))
            .unwrap_or_default()
    }

    fn held_candidates(&self) -> Option<Candidates> {
        let inner = self.inner.lock();
        inner
            .catalog
            .clone()
            .or_else(|| inner.geo_candidates.as_ref().map(|(_, c, _)| Arc::clone(c)))
    }

    fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn mark_loading(&self, seq: u64) {
        let mut inner = self.inner.lock();
        if seq > inner.applied {
            inner.state = SearchState::Loading;
        }
    }

    /// Record a failure unless a newer request has already been applied.
    fn fail(&self, seq: u64, error: &SearchError) {
        let mut inner = self.inner.lock();
        if seq > inner.applied {
            warn!(seq, error = %error, "Search failed, keeping previous results");
            inner.state = SearchState::Error;
            inner.error = Some(error.to_string());
            inner.applied = seq;
        } else {
            debug!(seq, applied = inner.applied, "Ignoring failure of superseded search");
        }
    }

    /// Run the pipeline and publish the result if `seq` is still the newest.
    fn apply(
        &self,
        seq: u64,
        query: SearchQuery,
        candidates: &Candidates,
        degraded: bool,
        store_candidates: impl FnOnce(&mut Inner),
    ) -> SearchSnapshot {
        let results = run_pipeline(candidates, &query, (self.clock)());
        let mut inner = self.inner.lock();
        if seq <= inner.applied {
            debug!(seq, applied = inner.applied, "Discarding superseded search result");
            return inner.snapshot();
        }
        store_candidates(&mut *inner);
        inner.results = Arc::new(results);
        inner.query = query;
        inner.state = SearchState::Ready;
        inner.error = None;
        inner.degraded = degraded;
        inner.applied = seq;
        inner.snapshot()
    }

    async fn fetch_catalog(&self) -> std::result::Result<Candidates, SearchError> {
        let items = load_catalog(
            &self.store,
            self.config.kind,
            &self.config.collection,
            self.config.page_size,
        )
        .await?;
        Ok(Arc::new(items))
    }

    /// Load the full collection and show it filtered by the current query.
    ///
    /// On failure the state becomes [`SearchState::Error`] and the previous
    /// results stay visible.
    #[instrument(name = "Load Catalog", level = "info", skip(self), fields(collection = %self.config.collection))]
    pub async fn load_catalog(&self) -> Result<SearchSnapshot> {
        let seq = self.next_sequence();
        self.mark_loading(seq);
        let query = self.inner.lock().query.clone();

        match self.fetch_catalog().await {
            Ok(catalog) => {
                info!(items = catalog.len(), "Catalog loaded");
                let stored = Arc::clone(&catalog);
                Ok(self.apply(seq, query, &catalog, false, move |inner| {
                    inner.catalog = Some(stored);
                }))
            }
            Err(e) => {
                self.fail(seq, &e);
                Err(e.into())
            }
        }
    }

    /// User-initiated retry: drop held candidates and rerun the current query.
    pub async fn refresh(&self) -> Result<SearchSnapshot> {
        let query = {
            let mut inner = self.inner.lock();
            inner.geo_candidates = None;
            inner.query.clone()
        };
        match self.config.mode {
            SearchMode::Catalog => self.load_catalog().await,
            SearchMode::GeoQuery => {
                self.inner.lock().catalog = None;
                self.search(query).await
            }
        }
    }

    fn source_for(&self, query: &SearchQuery) -> Source {
        match (self.config.mode, query.geo_key()) {
            (SearchMode::GeoQuery, Some(key)) => Source::Geo(key),
            _ => Source::Catalog,
        }
    }

    /// Recompute the result set for `query`.
    ///
    /// Attribute-only changes reuse the held candidates and complete without a
    /// loading state. A store query is issued only when no catalog is held yet
    /// or, in [`SearchMode::GeoQuery`], when the center or radius changed.
    #[instrument(name = "Search", level = "info", skip_all, fields(located = query.has_location_filter()))]
    pub async fn search(&self, query: SearchQuery) -> Result<SearchSnapshot> {
        let seq = self.next_sequence();
        let source = self.source_for(&query);

        let held = {
            let inner = self.inner.lock();
            match &source {
                Source::Catalog => inner.catalog.clone().map(|c| (c, false)),
                Source::Geo(key) => inner
                    .geo_candidates
                    .as_ref()
                    .filter(|(held_key, _, _)| held_key == key)
                    .map(|(_, c, degraded)| (Arc::clone(c), *degraded)),
            }
        };
        if let Some((candidates, degraded)) = held {
            debug!(seq, candidates = candidates.len(), "Reusing held candidates");
            return Ok(self.apply(seq, query, &candidates, degraded, |_| {}));
        }

        self.mark_loading(seq);
        let fetched = match source {
            Source::Catalog => self.fetch_catalog().await.map(|c| (c, false, None)),
            Source::Geo(key) => self.fetch_near(key).await.map(|(c, d)| (c, d, Some(key))),
        };

        match fetched {
            Ok((candidates, degraded, geo_key)) => {
                let stored = Arc::clone(&candidates);
                Ok(self.apply(seq, query, &candidates, degraded, move |inner| match geo_key {
                    Some(key) => inner.geo_candidates = Some((key, stored, degraded)),
                    None => inner.catalog = Some(stored),
                }))
            }
            Err(e) => {
                self.fail(seq, &e);
                Err(e.into())
            }
        }
    }

    async fn fetch_near(&self, (center, radius_miles): GeoKey) -> std::result::Result<(Candidates, bool), SearchError> {
        let bounds = query_bounds_with_precision(
            center,
            miles_to_meters(radius_miles),
            self.config.storage_precision,
        )?;
        debug!(bounds = ?bounds, "Querying geohash bounds");
        let outcome = CandidateFetcher::new(self.config.kind, self.config.max_per_bound)
            .with_collection(self.config.collection.as_str())
            .with_policy(self.config.fetch_policy)
            .fetch(&self.store, &bounds)
            .await?;
        Ok((Arc::new(outcome.items), outcome.degraded))
    }

    /// Resolve `request` into a search center and run `query` around it.
    ///
    /// An unknown ZIP code searches around the regional center. A denied or
    /// unavailable device position runs the search with no location filter. A
    /// code that is not five digits is rejected without touching the store or
    /// the current results.
    pub async fn search_at(
        &self,
        request: &LocationRequest,
        query: SearchQuery,
    ) -> Result<(ResolvedLocation, SearchSnapshot)> {
        let resolved = match (&self.location, request) {
            (Some(provider), _) => resolve_location(request, &self.zips, provider.as_ref()).await,
            (None, LocationRequest::CurrentPosition) => {
                let error = LocationError::PositionUnavailable("no location provider configured".to_string());
                warn!(error = %error, "Searching without location filter");
                ResolvedLocation::Unavailable(error)
            }
            (None, _) => resolve_location(request, &self.zips, &NoLocation).await,
        };
        if let ResolvedLocation::InvalidZip(zip) = &resolved {
            return Err(SearchError::InvalidQuery(format!("'{zip}' is not a 5-digit ZIP code")).into());
        }
        let query = SearchQuery {
            center: resolved.center(),
            ..query
        };
        let snapshot = self.search(query).await?;
        Ok((resolved, snapshot))
    }
}

/// Provider used when none is configured. Only reached for non-device requests.
struct NoLocation;

#[async_trait::async_trait]
impl LocationProvider for NoLocation {
    async fn current_coordinates(&self) -> std::result::Result<Coordinate, LocationError> {
        Err(LocationError::PositionUnavailable(
            "no location provider configured".to_string(),
        ))
    }
}
