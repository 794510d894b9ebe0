//! Seed documents modelled on the Maryland catalog, for demos and tests.
//!
//! Geohashes are precomputed at precision 6, the precision the seed scripts
//! write.

use serde_json::json;
use tracing::info;

use crate::{
    model::ItemKind,
    store::{Document, MemoryStore},
};

/// Configuration for test data generation
#[derive(Debug, Clone)]
pub struct TestDataConfig {
    /// Number of activity documents (capped at the seed table size)
    pub activities: usize,
    /// Number of event documents (capped at the seed table size)
    pub events: usize,
    /// Add one document without coordinates and one without a name to each collection
    pub include_incomplete: bool,
}

impl Default for TestDataConfig {
    fn default() -> Self {
        Self::sample()
    }
}

impl TestDataConfig {
    /// Minimal data for unit tests
    pub fn minimal() -> Self {
        Self {
            activities: 3,
            events: 3,
            include_incomplete: false,
        }
    }

    /// Everything in the seed tables, including incomplete records
    pub fn sample() -> Self {
        Self {
            activities: ACTIVITIES.len(),
            events: EVENTS.len(),
            include_incomplete: true,
        }
    }
}

struct SeedActivity {
    name: &'static str,
    category: &'static str,
    subcategory: &'static str,
    city: &'static str,
    zip: &'static str,
    lat: f64,
    lng: f64,
    geohash: &'static str,
    age_range: &'static str,
    is_free: bool,
}

const ACTIVITIES: [SeedActivity; 10] = [
    SeedActivity { name: "Patapsco Valley State Park", category: "Outdoor", subcategory: "Parks & Trails", city: "Ellicott City", zip: "21043", lat: 39.2904, lng: -76.7822, geohash: "dqcrsb", age_range: "All Ages", is_free: false },
    SeedActivity { name: "National Aquarium", category: "Educational & Enrichment", subcategory: "Aquariums", city: "Baltimore", zip: "21202", lat: 39.2851, lng: -76.6084, geohash: "dqcx2x", age_range: "All Ages", is_free: false },
    SeedActivity { name: "Port Discovery Children's Museum", category: "Educational & Enrichment", subcategory: "Museums", city: "Baltimore", zip: "21202", lat: 39.2896, lng: -76.6064, geohash: "dqcx8b", age_range: "0-10 kids", is_free: false },
    SeedActivity { name: "Quiet Waters Park", category: "Outdoor", subcategory: "Parks & Trails", city: "Annapolis", zip: "21403", lat: 38.9390, lng: -76.5063, geohash: "dqcte0", age_range: "All Ages", is_free: true },
    SeedActivity { name: "Annapolis Rock Climbing Gym", category: "Indoor", subcategory: "Climbing", city: "Annapolis", zip: "21401", lat: 38.9729, lng: -76.5565, geohash: "dqct9y", age_range: "Teens 13-18", is_free: false },
    SeedActivity { name: "Watkins Regional Park", category: "Outdoor", subcategory: "Playgrounds", city: "Upper Marlboro", zip: "20774", lat: 38.8882, lng: -76.7832, geohash: "dqcmhz", age_range: "Toddler & up", is_free: true },
    SeedActivity { name: "Clyde's Kids Menu Night", category: "Food & Dining", subcategory: "Kid-Friendly Dining", city: "Columbia", zip: "21045", lat: 39.2145, lng: -76.8617, geohash: "dqcr4f", age_range: "Children 4-12", is_free: false },
    SeedActivity { name: "Ocean City Boardwalk", category: "Outdoor", subcategory: "Beaches", city: "Ocean City", zip: "21842", lat: 38.3365, lng: -75.0849, geohash: "dqfd56", age_range: "All Ages", is_free: true },
    SeedActivity { name: "Glen Echo Park Carousel", category: "Outdoor", subcategory: "Rides", city: "Glen Echo", zip: "20812", lat: 38.9665, lng: -77.1391, geohash: "dqcjst", age_range: "Toddler", is_free: false },
    SeedActivity { name: "Baltimore Museum of Art", category: "Educational & Enrichment", subcategory: "Museums", city: "Baltimore", zip: "21218", lat: 39.3262, lng: -76.6194, geohash: "dqcx8r", age_range: "Adults 18+", is_free: true },
];

struct SeedEvent {
    name: &'static str,
    venue: &'static str,
    city: &'static str,
    zip: &'static str,
    lat: f64,
    lng: f64,
    geohash: &'static str,
    date: &'static str,
    age_range: &'static str,
    cost: &'static str,
}

const EVENTS: [SeedEvent; 10] = [
    SeedEvent { name: "Storytime", venue: "Barnes & Noble Annapolis", city: "Annapolis", zip: "21401", lat: 38.9903, lng: -76.5514, geohash: "dqctf1", date: "Every Saturday", age_range: "0-3", cost: "Free" },
    SeedEvent { name: "Kids Eat Free Night", venue: "Chick-fil-A Severna Park", city: "Severna Park", zip: "21146", lat: 39.0709, lng: -76.5455, geohash: "dqcw60", date: "Every Tuesday", age_range: "4-12", cost: "Free with adult purchase" },
    SeedEvent { name: "Family Movie Night", venue: "Maryland Live Casino", city: "Hanover", zip: "21076", lat: 39.1589, lng: -76.7289, geohash: "dqcqvb", date: "First Friday monthly", age_range: "All Ages", cost: "Free" },
    SeedEvent { name: "Toddler Art Class", venue: "Columbia Art Center", city: "Columbia", zip: "21045", lat: 39.2037, lng: -76.8610, geohash: "dqcr4b", date: "Every Wednesday", age_range: "0-3", cost: "$15 per class" },
    SeedEvent { name: "Free Museum Day", venue: "Maryland Science Center", city: "Baltimore", zip: "21230", lat: 39.2808, lng: -76.6122, geohash: "dqcx2w", date: "First Thursday monthly", age_range: "All Ages", cost: "Free" },
    SeedEvent { name: "Toddler Time", venue: "Bethesda Library", city: "Bethesda", zip: "20814", lat: 38.9847, lng: -77.0947, geohash: "dqcjv8", date: "Mondays & Wednesdays", age_range: "0-3", cost: "Free" },
    SeedEvent { name: "Outdoor Movie Night", venue: "Rockville Town Square", city: "Rockville", zip: "20850", lat: 39.0840, lng: -77.1528, geohash: "dqcnk7", date: "Fridays (June-August)", age_range: "All Ages", cost: "Free" },
    SeedEvent { name: "Storytime & Craft", venue: "Frederick County Public Library", city: "Frederick", zip: "21701", lat: 39.4143, lng: -77.4105, geohash: "dr0bnr", date: "Thursdays", age_range: "4-12", cost: "Free" },
    SeedEvent { name: "Beach Bonfire Night", venue: "Ocean City Beach", city: "Ocean City", zip: "21842", lat: 38.3365, lng: -75.0849, geohash: "dqfd56", date: "Saturdays (June-August)", age_range: "All Ages", cost: "Free" },
    SeedEvent { name: "Farm Day", venue: "Clarks Elioak Farm", city: "Ellicott City", zip: "21042", lat: 39.2437, lng: -76.9044, geohash: "dqcr3b", date: "Weekends (March-November)", age_range: "All Ages", cost: "$18 per person" },
];

fn activity_document(index: usize, seed: &SeedActivity) -> Document {
    let cost_type = if seed.is_free { "free" } else { "paid" };
    Document::new(
        format!("activity-{index:03}"),
        json!({
            "name": seed.name,
            "parentCategory": seed.category,
            "subcategory": seed.subcategory,
            "location": {
                "name": seed.name,
                "city": seed.city,
                "zipCode": seed.zip,
                "coordinates": {"latitude": seed.lat, "longitude": seed.lng},
                "geohash": seed.geohash,
            },
            "filters": {
                "ageRange": seed.age_range,
                "isFree": seed.is_free,
                "costType": cost_type,
            },
        }),
    )
}

fn event_document(index: usize, seed: &SeedEvent) -> Document {
    let cost = seed.cost.to_lowercase();
    let is_free = cost.contains("free") && !cost.contains("extra");
    let cost_type = if cost.contains("free") { "free" } else { "paid" };
    Document::new(
        format!("event-{index:03}"),
        json!({
            "name": seed.name,
            "type": "Event",
            "parentCategory": "Events & Programs",
            "subcategory": "Community Events",
            "eventType": "Community",
            "location": {
                "name": seed.venue,
                "city": seed.city,
                "zipCode": seed.zip,
                "coordinates": {"latitude": seed.lat, "longitude": seed.lng},
                "geohash": seed.geohash,
            },
            "eventDate": {"display": seed.date, "recurring": true},
            "filters": {
                "ageRange": seed.age_range,
                "isFree": is_free,
                "costType": cost_type,
                "costDetails": seed.cost,
            },
        }),
    )
}

fn incomplete_documents(prefix: &str) -> [Document; 2] {
    [
        Document::new(
            format!("{prefix}-no-coordinates"),
            json!({"name": "Mobile Petting Zoo", "parentCategory": "Outdoor", "location": {"city": "Anywhere"}}),
        ),
        Document::new(
            format!("{prefix}-no-name"),
            json!({
                "parentCategory": "Indoor",
                "location": {
                    "coordinates": {"latitude": 38.9784, "longitude": -76.4922},
                    "geohash": "dqcter"
                }
            }),
        ),
    ]
}

/// Build the seed documents for one kind.
pub fn sample_documents(kind: ItemKind, config: &TestDataConfig) -> Vec<Document> {
    let mut documents: Vec<Document> = match kind {
        ItemKind::Activity => ACTIVITIES
            .iter()
            .take(config.activities)
            .enumerate()
            .map(|(i, seed)| activity_document(i, seed))
            .collect(),
        ItemKind::Event => EVENTS
            .iter()
            .take(config.events)
            .enumerate()
            .map(|(i, seed)| event_document(i, seed))
            .collect(),
    };
    if config.include_incomplete {
        documents.extend(incomplete_documents(kind.collection()));
    }
    documents
}

/// A [`MemoryStore`] holding both seed collections.
pub fn create_test_store(config: &TestDataConfig) -> MemoryStore {
    info!("Creating test store with config: {:?}", config);
    let store = MemoryStore::new();
    for kind in [ItemKind::Activity, ItemKind::Event] {
        store.insert_all(kind.collection(), sample_documents(kind, config));
    }
    store
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::normalize_documents;

    #[test]
    fn test_minimal_config() {
        let docs = sample_documents(ItemKind::Activity, &TestDataConfig::minimal());
        assert_eq!(docs.len(), 3);
    }

    #[test]
    fn test_sample_includes_incomplete_records() {
        let store = create_test_store(&TestDataConfig::sample());
        assert_eq!(store.len("activities"), ACTIVITIES.len() + 2);
        assert_eq!(store.len("events"), EVENTS.len() + 2);
    }

    #[test]
    fn test_seed_documents_normalize() {
        let docs = sample_documents(ItemKind::Event, &TestDataConfig::sample());
        let items = normalize_documents(ItemKind::Event, &docs);
        assert_eq!(items.len(), docs.len());
        assert!(items.iter().filter(|i| i.coordinates().is_some()).count() >= EVENTS.len());
        assert!(items.iter().take(EVENTS.len()).all(|i| i.is_recurring()));
    }
}
