use std::sync::Arc;

use rayon::prelude::*;
use socialspot_data::{Coordinate, Item};
use tracing::debug;

use super::SearchHit;
use crate::geo::distance_miles;

/// Exact radius cut. Geohash bounds over-select; this is the authoritative
/// location filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityFilter {
    pub center: Coordinate,
    pub radius_miles: f64,
}

impl ProximityFilter {
    pub fn new(center: Coordinate, radius_miles: f64) -> Self {
        Self {
            center,
            radius_miles,
        }
    }

    /// Distance from the center if `item` lies within the radius.
    ///
    /// Items without usable coordinates never match.
    pub fn distance_if_within(&self, item: &Item) -> Option<f64> {
        let coordinates = item.coordinates().filter(Coordinate::is_valid)?;
        let distance = distance_miles(self.center, coordinates);
        (distance <= self.radius_miles).then_some(distance)
    }

    /// Keep the candidates inside the radius, in input order, each paired with
    /// its unrounded distance.
    pub fn apply(&self, candidates: &[Arc<Item>]) -> Vec<SearchHit> {
        let hits: Vec<SearchHit> = candidates
            .par_iter()
            .filter_map(|item| {
                self.distance_if_within(item)
                    .map(|d| SearchHit::new(Arc::clone(item), Some(d)))
            })
            .collect();
        debug!(
            candidates = candidates.len(),
            within = hits.len(),
            radius_miles = self.radius_miles,
            "Applied radius cut"
        );
        hits
    }
}
