//! The search pipeline.
//!
//! Stages run in a fixed order: geo-bounded candidate fetch, exact radius cut,
//! attribute predicates, ranking. Everything after the fetch is pure and
//! synchronous; see [`run_pipeline`].

pub use error::SearchError;
mod facets;
mod fetch;
mod filters;
pub mod heuristics;
mod location;
mod pipeline;
mod proximity;
mod query;
mod rank;

use error::Result;
pub use facets::{filtered_count, unique_categories, unique_event_types};
pub use fetch::{CandidateFetcher, FetchOutcome, FetchPolicy, GEOHASH_FIELD};
pub use filters::AttributeFilterChain;
pub use location::{LocationRequest, ResolvedLocation, resolve_location};
pub use pipeline::run_pipeline;
pub use proximity::ProximityFilter;
pub use query::{
    AgeBand, CategoryFilter, DEFAULT_RADIUS_MILES, DateWindow, RADIUS_OPTIONS_MILES, SearchHit,
    SearchQuery, SearchQueryBuilder,
};
pub use rank::ResultRanker;

mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum SearchError {
        #[error("Geo error: {0}")]
        Geo(#[from] crate::geo::GeoError),
        #[error("Store error: {0}")]
        Data(#[from] socialspot_data::DataError),
        #[error("Invalid query: {0}")]
        InvalidQuery(String),
        #[error(transparent)]
        Other(#[from] anyhow::Error),
    }
    pub type Result<T> = std::result::Result<T, SearchError>;
}
