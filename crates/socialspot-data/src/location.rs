//! Device position interface.

use async_trait::async_trait;
use thiserror::Error;

use crate::model::Coordinate;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Current position unavailable: {0}")]
    PositionUnavailable(String),
}

/// Source of the device's current coordinates (GPS or platform equivalent).
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_coordinates(&self) -> Result<Coordinate, LocationError>;
}

/// Provider returning a fixed answer. Used by demos and tests.
#[derive(Debug, Clone)]
pub struct FixedLocationProvider {
    answer: Result<Coordinate, LocationError>,
}

impl FixedLocationProvider {
    pub fn at(coordinate: Coordinate) -> Self {
        Self {
            answer: Ok(coordinate),
        }
    }

    pub fn failing(error: LocationError) -> Self {
        Self { answer: Err(error) }
    }
}

#[async_trait]
impl LocationProvider for FixedLocationProvider {
    async fn current_coordinates(&self) -> Result<Coordinate, LocationError> {
        self.answer.clone()
    }
}
