//! SocialSpot - proximity search and filtering for a regional activity catalog
//!
//! Takes a location and radius, narrows the catalog to geographically relevant
//! candidates with geohash range queries, cuts them by exact great-circle
//! distance, applies category, cost, age and date filters, and returns a
//! stably ordered result set.
//!
//! # Quick Start
//!
//! ```rust
//! use socialspot::{SearchQuery, run_pipeline};
//! use socialspot::data::{Coordinate, Item, ItemKind};
//! use std::sync::Arc;
//!
//! let center = Coordinate::new(38.9784, -76.4922)?;
//! let catalog = vec![
//!     Arc::new(Item::new("1", ItemKind::Activity, "Quiet Waters Park")
//!         .with_coordinates(Coordinate::new(38.9390, -76.5063)?)),
//!     Arc::new(Item::new("2", ItemKind::Activity, "Ocean City Boardwalk")
//!         .with_coordinates(Coordinate::new(38.3365, -75.0849)?)),
//! ];
//!
//! let query = SearchQuery::builder().center(center).radius_miles(10.0).build()?;
//! let today = chrono::Local::now().date_naive();
//! let hits = run_pipeline(&catalog, &query, today);
//!
//! assert_eq!(hits.len(), 1);
//! println!("{} is {:?} miles away", hits[0].name(), hits[0].display_distance());
//! # Ok::<(), socialspot::error::SocialSpotError>(())
//! ```
//!
//! # Components
//!
//! - **Geo**: geohash encoding, disc-covering range bounds, Haversine distance
//! - **Search**: candidate fetch, radius cut, attribute filters, ranking
//! - **Coordinator**: per-screen result state with stale-result protection
//! - **Data**: canonical item model, document normalization, store interfaces
use once_cell::sync::OnceCell;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

mod config;
mod coordinator;
pub mod error;
pub mod geo;
pub mod search;

pub use config::{CoordinatorConfig, CoordinatorConfigBuilder, DEFAULT_MAX_PER_BOUND, SearchMode};
pub use coordinator::{SearchCoordinator, SearchSnapshot, SearchState};
pub use geo::{GeohashBound, distance_miles, encode, query_bounds};
pub use search::{
    AgeBand, AttributeFilterChain, CandidateFetcher, CategoryFilter, DateWindow, FetchOutcome,
    FetchPolicy, LocationRequest, ProximityFilter, ResolvedLocation, ResultRanker, SearchHit,
    SearchQuery, SearchQueryBuilder, filtered_count, run_pipeline, unique_categories,
    unique_event_types,
};
pub use socialspot_data as data;

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Initialize logging for the SocialSpot library.
///
/// Honours `RUST_LOG` when set, otherwise logs at `level`. Safe to call more
/// than once; only the first call installs the subscriber.
///
/// # Examples
///
/// ```rust
/// use socialspot::init_logging;
/// use tracing::Level;
///
/// init_logging(Level::INFO)?;
/// # Ok::<(), socialspot::error::SocialSpotError>(())
/// ```
pub fn init_logging(level: impl Into<LevelFilter>) -> Result<&'static (), error::SocialSpotError> {
    LOGGER_INIT.get_or_try_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level.into().to_string()))?;

        tracing_subscriber::fmt::fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .try_init()
            .map_err(|e| anyhow::anyhow!(e))?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use socialspot_data::{Coordinate, Item, ItemKind};

    use super::*;

    fn setup_test_env() {
        let _ = init_logging(tracing::Level::WARN);
    }

    #[test]
    fn test_init_logging_is_idempotent() {
        setup_test_env();
        assert!(init_logging(tracing::Level::DEBUG).is_ok());
    }

    #[test]
    fn test_quick_start_flow() {
        setup_test_env();

        let center = Coordinate::new(38.9784, -76.4922).unwrap();
        let catalog = vec![
            Arc::new(
                Item::new("1", ItemKind::Activity, "Quiet Waters Park")
                    .with_coordinates(Coordinate::new(38.9390, -76.5063).unwrap())
                    .with_category("Outdoor"),
            ),
            Arc::new(
                Item::new("2", ItemKind::Activity, "Ocean City Boardwalk")
                    .with_coordinates(Coordinate::new(38.3365, -75.0849).unwrap())
                    .with_category("Outdoor"),
            ),
        ];
        let query = SearchQuery::builder()
            .center(center)
            .radius_miles(10.0)
            .category("Outdoor Fun")
            .build()
            .unwrap();
        let today = chrono::NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();

        let hits = run_pipeline(&catalog, &query, today);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name(), "Quiet Waters Park");
        assert_eq!(filtered_count(&catalog, &query, today), 1);
    }

    #[test]
    fn test_bounds_contain_encoded_center() {
        let center = Coordinate::new(39.2851, -76.6084).unwrap();
        let hash = encode(center, geo::DEFAULT_STORAGE_PRECISION).unwrap();
        let bounds = query_bounds(center, geo::miles_to_meters(5.0)).unwrap();
        assert!(bounds.iter().any(|b| b.contains(&hash)));
    }
}
