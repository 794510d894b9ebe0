use std::sync::Arc;

use socialspot_data::{Coordinate, Item};

use super::{Result, SearchError};
use crate::geo::round_for_display;

/// Radius choices offered by the location search bar.
pub const RADIUS_OPTIONS_MILES: [f64; 4] = [5.0, 10.0, 25.0, 50.0];

pub const DEFAULT_RADIUS_MILES: f64 = 25.0;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CategoryFilter {
    #[default]
    All,
    /// Display category label, e.g. `"Outdoor Fun"`.
    Only(String),
}

/// Coarse age grouping matched against an item's free-text age range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgeBand {
    #[default]
    All,
    Toddler,
    Kids,
    Teens,
    Adults,
}

/// Which event dates are shown. Only applies to events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DateWindow {
    /// Dated today or later, plus undated and recurring events.
    #[default]
    Upcoming,
    Today,
    /// The seven days starting today.
    Week,
    /// Today up to the same day next month.
    Month,
    All,
}

/// One search pass worth of user selections.
///
/// Built once per interaction with [`SearchQuery::builder`] and never mutated by
/// the pipeline.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchQuery {
    /// `None` disables the location filter and switches ranking to name order.
    pub center: Option<Coordinate>,
    pub radius_miles: f64,
    pub category: CategoryFilter,
    pub free_only: bool,
    pub age_band: AgeBand,
    pub date_window: DateWindow,
    /// Event type multi-select; empty means every type.
    pub event_types: Vec<String>,
    pub show_past: bool,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            center: None,
            radius_miles: DEFAULT_RADIUS_MILES,
            category: CategoryFilter::All,
            free_only: false,
            age_band: AgeBand::All,
            date_window: DateWindow::Upcoming,
            event_types: Vec::new(),
            show_past: false,
        }
    }
}

impl SearchQuery {
    pub fn builder() -> SearchQueryBuilder {
        SearchQueryBuilder::default()
    }

    pub fn has_location_filter(&self) -> bool {
        self.center.is_some()
    }

    /// The part of the query that decides which candidates a geo fetch returns.
    pub fn geo_key(&self) -> Option<(Coordinate, f64)> {
        self.center.map(|c| (c, self.radius_miles))
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchQueryBuilder {
    query: SearchQuery,
}

impl SearchQueryBuilder {
    pub fn center(mut self, center: Coordinate) -> Self {
        self.query.center = Some(center);
        self
    }

    /// Set or clear the location filter.
    pub fn location(mut self, center: Option<Coordinate>) -> Self {
        self.query.center = center;
        self
    }

    pub fn radius_miles(mut self, radius: f64) -> Self {
        self.query.radius_miles = radius;
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        let category = category.into();
        self.query.category = if category == "All" {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(category)
        };
        self
    }

    pub fn free_only(mut self, free_only: bool) -> Self {
        self.query.free_only = free_only;
        self
    }

    pub fn age_band(mut self, band: AgeBand) -> Self {
        self.query.age_band = band;
        self
    }

    pub fn date_window(mut self, window: DateWindow) -> Self {
        self.query.date_window = window;
        self
    }

    pub fn event_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.query.event_types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn show_past(mut self, show_past: bool) -> Self {
        self.query.show_past = show_past;
        self
    }

    /// Validate and freeze the query. The radius must be finite and positive.
    pub fn build(self) -> Result<SearchQuery> {
        let radius = self.query.radius_miles;
        if !radius.is_finite() || radius <= 0.0 {
            return Err(SearchError::InvalidQuery(format!(
                "radius must be a positive number of miles, got {radius}"
            )));
        }
        Ok(self.query)
    }
}

/// An item surviving the pipeline, with its distance from the search center.
///
/// The shared [`Item`] is never modified; distance lives here.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SearchHit {
    pub item: Arc<Item>,
    /// Unrounded miles. `None` when no location filter was applied.
    pub distance_miles: Option<f64>,
}

impl SearchHit {
    pub fn new(item: Arc<Item>, distance_miles: Option<f64>) -> Self {
        Self {
            item,
            distance_miles,
        }
    }

    pub fn unlocated(item: Arc<Item>) -> Self {
        Self::new(item, None)
    }

    /// Distance rounded to one decimal place.
    pub fn display_distance(&self) -> Option<f64> {
        self.distance_miles.map(round_for_display)
    }

    pub fn id(&self) -> &str {
        &self.item.id
    }

    pub fn name(&self) -> &str {
        self.item.name()
    }
}
