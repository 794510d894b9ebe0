//! Values feeding the filter bars.

use std::sync::Arc;

use chrono::NaiveDate;
use itertools::Itertools;
use socialspot_data::Item;

use super::{SearchQuery, run_pipeline};

/// Distinct display categories, sorted.
pub fn unique_categories(items: &[Arc<Item>]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| item.display_category.clone())
        .filter(|c| !c.is_empty())
        .sorted()
        .dedup()
        .collect()
}

/// Distinct event types, sorted.
pub fn unique_event_types(items: &[Arc<Item>]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| item.event_type.clone())
        .filter(|t| !t.is_empty())
        .sorted()
        .dedup()
        .collect()
}

/// Size of the result set `query` would produce.
pub fn filtered_count(items: &[Arc<Item>], query: &SearchQuery, today: NaiveDate) -> usize {
    run_pipeline(items, query, today).len()
}
