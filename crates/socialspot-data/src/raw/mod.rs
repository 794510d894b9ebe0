//! Ingestion-time normalization of raw store documents.
//!
//! Records written by different seed scripts disagree on where coordinates, venue
//! names, age ranges and dates live. [`normalize_document`] resolves every known
//! variant once and produces a canonical [`Item`].

use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::{
    error::{DataError, Result},
    model::{Coordinate, EventSchedule, Item, ItemFilters, ItemKind, ItemLocation, display_category},
    store::Document,
};

pub mod lookup;

use lookup::{first_number, first_text, flag, path, text};

const COORDINATE_PATHS: [&str; 4] = ["location.coordinates", "coordinates", "location", ""];
const LATITUDE_KEYS: [&str; 2] = ["latitude", "lat"];
const LONGITUDE_KEYS: [&str; 3] = ["longitude", "lon", "lng"];

/// Map one raw document onto the canonical [`Item`] shape.
///
/// Fails only when the document is not a JSON object. Missing or unusable
/// fields are left empty so the item can still be listed.
pub fn normalize_document(kind: ItemKind, id: &str, data: &Value) -> Result<Item> {
    if !data.is_object() {
        return Err(DataError::MalformedDocument {
            id: id.to_string(),
            reason: "document body is not an object".to_string(),
        });
    }

    let parent_category = first_text(data, &["parentCategory"]);
    let display = parent_category
        .as_deref()
        .map(|category| display_category(category).to_string());

    Ok(Item {
        id: id.to_string(),
        kind,
        name: first_text(data, &["name", "title"]),
        location: normalize_location(id, data),
        display_category: display,
        parent_category,
        subcategory: first_text(data, &["subcategory"]),
        event_type: first_text(data, &["eventType"]),
        filters: normalize_filters(data),
        schedule: normalize_schedule(data),
        description: first_text(data, &["description"]),
        website: first_text(data, &["contact.website", "website"]),
    })
}

/// Normalize a batch, skipping documents that cannot be read.
#[instrument(name = "Normalize documents", skip_all, fields(kind = ?kind, count = documents.len()))]
pub fn normalize_documents(kind: ItemKind, documents: &[Document]) -> Vec<Item> {
    documents
        .iter()
        .filter_map(|doc| match normalize_document(kind, &doc.id, &doc.data) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(id = %doc.id, error = %e, "Skipping malformed document");
                None
            }
        })
        .collect()
}

fn normalize_location(id: &str, data: &Value) -> ItemLocation {
    // `location` is sometimes a plain "Venue, Street, City" string.
    let location_string = path(data, "location").and_then(Value::as_str);

    ItemLocation {
        coordinates: read_coordinates(id, data),
        geohash: first_text(data, &["location.geohash", "geohash"]),
        venue: first_text(data, &["venue"])
            .or_else(|| {
                location_string
                    .and_then(|s| s.split(',').next())
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
            })
            .or_else(|| first_text(data, &["location.name"])),
        address: first_text(data, &["location.address", "address"]),
        city: first_text(data, &["location.city", "city"]),
        zip_code: first_text(
            data,
            &["location.zipCode", "location.zip", "zipCode", "zip"],
        ),
    }
}

fn read_coordinates(id: &str, data: &Value) -> Option<Coordinate> {
    COORDINATE_PATHS.iter().find_map(|candidate| {
        let holder = if candidate.is_empty() {
            data
        } else {
            path(data, candidate)?
        };
        let latitude = first_number(holder, &LATITUDE_KEYS)?;
        let longitude = first_number(holder, &LONGITUDE_KEYS)?;
        Coordinate::new(latitude, longitude)
            .inspect_err(|e| debug!(id, error = %e, "Ignoring unusable coordinates"))
            .ok()
    })
}

fn normalize_filters(data: &Value) -> ItemFilters {
    ItemFilters {
        age_range: first_text(data, &["ageRange", "filters.ageRange"]),
        is_free: flag(data, "filters.isFree"),
        cost_type: first_text(data, &["filters.costType"]),
        cost_details: first_text(data, &["filters.costDetails", "cost"]),
    }
}

fn normalize_schedule(data: &Value) -> Option<EventSchedule> {
    let event_date = path(data, "eventDate");
    let schedule = EventSchedule {
        date_text: event_date
            .and_then(text)
            .or_else(|| first_text(data, &["eventStartDate"])),
        schedule_text: first_text(data, &["scheduleDescription"]),
        frequency: first_text(data, &["schedule", "frequency"]),
        recurring: flag(data, "recurring") || flag(data, "eventDate.recurring"),
    };

    (schedule != EventSchedule::default()).then_some(schedule)
}
