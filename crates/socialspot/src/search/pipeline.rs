use std::sync::Arc;

use chrono::NaiveDate;
use socialspot_data::Item;
use tracing::{info, instrument};

use super::{AttributeFilterChain, ProximityFilter, ResultRanker, SearchHit, SearchQuery};

/// Radius cut, attribute predicates, then ranking.
///
/// Pure: the same items, query and date always give the same ordered result.
/// Without a center the result is the attribute-filtered catalog in name order.
#[instrument(name = "Run Pipeline", level = "debug", skip_all, fields(items = items.len(), located = query.has_location_filter()))]
pub fn run_pipeline(items: &[Arc<Item>], query: &SearchQuery, today: NaiveDate) -> Vec<SearchHit> {
    let hits = match query.center {
        Some(center) => ProximityFilter::new(center, query.radius_miles).apply(items),
        None => items.iter().cloned().map(SearchHit::unlocated).collect(),
    };
    let hits = AttributeFilterChain::new(query, today).apply(hits);
    let ranked = ResultRanker::rank(hits, query.has_location_filter());
    info!(input = items.len(), results = ranked.len(), "Search pipeline complete");
    ranked
}
