use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use super::SearchHit;

/// Final ordering of a result set.
///
/// Both orders are stable: equal keys keep their input order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultRanker;

impl ResultRanker {
    /// Distance ascending when a location filter is active, otherwise by name.
    pub fn rank(mut hits: Vec<SearchHit>, has_location_filter: bool) -> Vec<SearchHit> {
        if has_location_filter {
            hits.sort_by(|a, b| {
                let a = a.distance_miles.unwrap_or(f64::INFINITY);
                let b = b.distance_miles.unwrap_or(f64::INFINITY);
                a.total_cmp(&b)
            });
        } else {
            hits.sort_by_cached_key(|hit| name_sort_key(hit.name()));
        }
        hits
    }
}

/// Case and accent folded key, so `"Éclair"` sorts with `"eclair"`.
///
/// Missing or blank names have the lowest priority and sort last.
fn name_sort_key(name: &str) -> (bool, String) {
    let folded: String = name
        .trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect();
    (folded.is_empty(), folded)
}
