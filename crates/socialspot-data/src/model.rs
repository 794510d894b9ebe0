//! Canonical item model shared by the whole workspace.
//!
//! Store documents arrive in several loosely related shapes. They are mapped into
//! [`Item`] exactly once, at ingestion time (see [`crate::raw`]), so the search
//! pipeline never walks optional nested paths.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DataError, Result};

/// A point on the globe in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Create a validated coordinate.
    ///
    /// Latitude must lie in `[-90, 90]` and longitude in `[-180, 180]`.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite()
            || !longitude.is_finite()
            || !(-90.0..=90.0).contains(&latitude)
            || !(-180.0..=180.0).contains(&longitude)
        {
            return Err(DataError::InvalidCoordinate {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// `true` when both components are finite and in range.
    pub fn is_valid(&self) -> bool {
        Self::new(self.latitude, self.longitude).is_ok()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.latitude, self.longitude)
    }
}

/// Which catalog an item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Activity,
    Event,
}

impl ItemKind {
    /// Store collection holding items of this kind.
    pub fn collection(self) -> &'static str {
        match self {
            Self::Activity => "activities",
            Self::Event => "events",
        }
    }
}

const DISPLAY_CATEGORIES: [(&str, &str); 5] = [
    ("Food & Dining", "Food & Dining"),
    ("Outdoor", "Outdoor Fun"),
    ("Indoor", "Indoor Fun"),
    ("Educational & Enrichment", "Arts, Culture & Learning"),
    ("Events & Programs", "Events & Programs"),
];

/// Map a store category onto the label shown in the category filter bar.
///
/// Unknown categories pass through unchanged.
pub fn display_category(parent_category: &str) -> &str {
    DISPLAY_CATEGORIES
        .iter()
        .find(|(raw, _)| *raw == parent_category)
        .map_or(parent_category, |(_, display)| display)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemLocation {
    /// `None` when the source record has no usable coordinates.
    pub coordinates: Option<Coordinate>,
    pub geohash: Option<String>,
    pub venue: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub zip_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemFilters {
    /// Free text such as `"4-12"` or `"All Ages"`.
    pub age_range: Option<String>,
    pub is_free: bool,
    pub cost_type: Option<String>,
    pub cost_details: Option<String>,
}

/// Date and recurrence information carried by events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSchedule {
    /// Primary date text (`eventDate`, `eventStartDate`).
    pub date_text: Option<String>,
    /// Secondary free-text schedule (`scheduleDescription`).
    pub schedule_text: Option<String>,
    /// Cadence label such as `Weekly` or `Daily`.
    pub frequency: Option<String>,
    pub recurring: bool,
}

/// An activity or event as the search core sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub kind: ItemKind,
    /// Missing names sort last and never crash ranking.
    pub name: Option<String>,
    pub location: ItemLocation,
    pub parent_category: Option<String>,
    pub display_category: Option<String>,
    pub subcategory: Option<String>,
    pub event_type: Option<String>,
    pub filters: ItemFilters,
    pub schedule: Option<EventSchedule>,
    pub description: Option<String>,
    pub website: Option<String>,
}

impl Item {
    /// Minimal item with only an id, kind and name; everything else empty.
    pub fn new(id: impl Into<String>, kind: ItemKind, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            name: Some(name.into()),
            location: ItemLocation::default(),
            parent_category: None,
            display_category: None,
            subcategory: None,
            event_type: None,
            filters: ItemFilters::default(),
            schedule: None,
            description: None,
            website: None,
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn coordinates(&self) -> Option<Coordinate> {
        self.location.coordinates
    }

    pub fn with_coordinates(mut self, coordinates: Coordinate) -> Self {
        self.location.coordinates = Some(coordinates);
        self
    }

    pub fn with_category(mut self, parent_category: impl Into<String>) -> Self {
        let parent_category = parent_category.into();
        self.display_category = Some(display_category(&parent_category).to_string());
        self.parent_category = Some(parent_category);
        self
    }

    pub fn with_age_range(mut self, age_range: impl Into<String>) -> Self {
        self.filters.age_range = Some(age_range.into());
        self
    }

    pub fn with_free(mut self, is_free: bool) -> Self {
        self.filters.is_free = is_free;
        self
    }

    pub fn with_schedule(mut self, schedule: EventSchedule) -> Self {
        self.schedule = Some(schedule);
        self
    }

    pub fn with_event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }

    /// Recurring events are always eligible for the current date window.
    pub fn is_recurring(&self) -> bool {
        self.schedule.as_ref().is_some_and(|s| {
            s.recurring || matches!(s.frequency.as_deref(), Some("Weekly" | "Daily"))
        })
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Item {{ id: {}, name: \"{}\" }}", self.id, self.name())
    }
}
