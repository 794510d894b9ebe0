//! Geospatial primitives: geohash encoding, covering range bounds and
//! great-circle distance.
//!
//! Everything here is pure and synchronous. The bounds produced by
//! [`query_bounds`] over-select; [`distance_miles`] is the authoritative cut.

pub use error::GeoError;
mod distance;
mod geohash;

pub use distance::{
    EARTH_RADIUS_MILES, METERS_PER_MILE, destination, distance_miles, miles_to_meters,
    round_for_display,
};
use error::Result;
pub use geohash::{
    DEFAULT_STORAGE_PRECISION, GEOHASH_ALPHABET, GeohashBound, GeohashCell, MAX_PRECISION, decode,
    encode, query_bounds, query_bounds_with_precision,
};

mod error {
    use thiserror::Error;

    #[derive(Error, Debug, Clone, PartialEq)]
    pub enum GeoError {
        #[error("Geohash precision must be between 1 and {max}, got {precision}")]
        InvalidPrecision { precision: usize, max: usize },
        #[error("Invalid geohash '{0}'")]
        InvalidGeohash(String),
        #[error("Radius must be a finite, non-negative number of meters, got {0}")]
        InvalidRadius(f64),
        #[error("Coordinate out of range: ({latitude}, {longitude})")]
        InvalidCoordinate { latitude: f64, longitude: f64 },
    }
    pub type Result<T> = std::result::Result<T, GeoError>;
}
