//! ZIP code to coordinate resolution.

use crate::model::Coordinate;

/// Center of the service area, used for any ZIP code not in the table.
pub const REGIONAL_CENTER: Coordinate = Coordinate {
    latitude: 38.8,
    longitude: -76.5,
};

const KNOWN_ZIPS: &[(&str, Coordinate)] = &[
    // Baltimore
    ("21201", Coordinate { latitude: 39.2904, longitude: -76.6122 }),
    ("21202", Coordinate { latitude: 39.2904, longitude: -76.6122 }),
    // Princess Anne
    ("21853", Coordinate { latitude: 38.2046, longitude: -75.6939 }),
    // Dundalk
    ("21222", Coordinate { latitude: 39.2575, longitude: -76.5226 }),
    // Rockville
    ("20850", Coordinate { latitude: 39.0840, longitude: -77.1528 }),
    // Annapolis
    ("21401", Coordinate { latitude: 38.9784, longitude: -76.4922 }),
];

/// Resolves 5-digit ZIP codes to coordinates.
///
/// Unknown codes resolve to [`REGIONAL_CENTER`] rather than failing.
#[derive(Debug, Clone)]
pub struct ZipResolver {
    table: Vec<(String, Coordinate)>,
    fallback: Coordinate,
}

impl Default for ZipResolver {
    fn default() -> Self {
        Self {
            table: KNOWN_ZIPS
                .iter()
                .map(|(zip, coord)| ((*zip).to_string(), *coord))
                .collect(),
            fallback: REGIONAL_CENTER,
        }
    }
}

impl ZipResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a table entry.
    pub fn with_zip(mut self, zip: impl Into<String>, coordinate: Coordinate) -> Self {
        let zip = zip.into();
        self.table.retain(|(known, _)| *known != zip);
        self.table.push((zip, coordinate));
        self
    }

    pub fn with_fallback(mut self, fallback: Coordinate) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn fallback(&self) -> Coordinate {
        self.fallback
    }

    /// Exact table lookup.
    pub fn lookup(&self, zip: &str) -> Option<Coordinate> {
        let zip = zip.trim();
        self.table
            .iter()
            .find(|(known, _)| known == zip)
            .map(|(_, coord)| *coord)
    }

    /// Resolve a ZIP code, falling back to the regional center.
    pub fn resolve(&self, zip: &str) -> Coordinate {
        self.lookup(zip).unwrap_or_else(|| {
            tracing::debug!(zip, "Unknown ZIP code, using regional center");
            self.fallback
        })
    }

    /// `true` for a syntactically valid 5-digit US ZIP code.
    pub fn is_valid_zip(zip: &str) -> bool {
        zip.len() == 5 && zip.bytes().all(|b| b.is_ascii_digit())
    }
}
