use chrono::{Days, NaiveDate};
use socialspot_data::{Item, ItemKind};
use tracing::debug;

use super::{
    CategoryFilter, DateWindow, SearchHit, SearchQuery,
    heuristics::{event_date, matches_age_band, month_after},
};

/// Category, cost, age, event type and date predicates.
///
/// Each predicate is a no-op when its query field is unset. The predicates are
/// independent, so evaluation order only affects speed; cheap field
/// comparisons run before the text heuristics.
#[derive(Debug, Clone, Copy)]
pub struct AttributeFilterChain<'q> {
    query: &'q SearchQuery,
    today: NaiveDate,
}

impl<'q> AttributeFilterChain<'q> {
    pub fn new(query: &'q SearchQuery, today: NaiveDate) -> Self {
        Self { query, today }
    }

    /// Keep the hits matching every predicate, preserving order.
    pub fn apply(&self, hits: Vec<SearchHit>) -> Vec<SearchHit> {
        let before = hits.len();
        let kept: Vec<SearchHit> = hits.into_iter().filter(|hit| self.matches(&hit.item)).collect();
        debug!(before, after = kept.len(), "Applied attribute filters");
        kept
    }

    pub fn matches(&self, item: &Item) -> bool {
        self.matches_category(item)
            && self.matches_free(item)
            && self.matches_event_type(item)
            && matches_age_band(item.filters.age_range.as_deref(), self.query.age_band)
            && self.matches_date_window(item)
    }

    fn matches_category(&self, item: &Item) -> bool {
        match &self.query.category {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => {
                item.display_category.as_deref() == Some(category.as_str())
            }
        }
    }

    fn matches_free(&self, item: &Item) -> bool {
        !self.query.free_only || item.filters.is_free
    }

    fn matches_event_type(&self, item: &Item) -> bool {
        self.query.event_types.is_empty()
            || item
                .event_type
                .as_ref()
                .is_some_and(|t| self.query.event_types.contains(t))
    }

    /// Date window and past-event hiding. Activities always pass.
    fn matches_date_window(&self, item: &Item) -> bool {
        if item.kind != ItemKind::Event {
            return true;
        }
        let today = self.today;
        let date = event_date(item, today);
        let recurring = item.is_recurring();

        if !self.query.show_past && !recurring && date.is_some_and(|d| d < today) {
            return false;
        }

        // Recurring events are in every current window whatever date they carry.
        let within = |end: NaiveDate| recurring || date.is_some_and(|d| d >= today && d < end);
        match self.query.date_window {
            DateWindow::All => true,
            DateWindow::Upcoming => recurring || date.is_none_or(|d| d >= today),
            DateWindow::Today => within(today + Days::new(1)),
            DateWindow::Week => within(today + Days::new(7)),
            DateWindow::Month => within(month_after(today)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use socialspot_data::EventSchedule;

    use super::*;
    use crate::search::AgeBand;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn hits(items: Vec<Item>) -> Vec<SearchHit> {
        items.into_iter().map(|i| SearchHit::unlocated(Arc::new(i))).collect()
    }

    fn ids(hits: &[SearchHit]) -> Vec<&str> {
        hits.iter().map(SearchHit::id).collect()
    }

    fn dated_event(id: &str, date: &str) -> Item {
        Item::new(id, ItemKind::Event, id).with_schedule(EventSchedule {
            date_text: Some(date.to_string()),
            ..EventSchedule::default()
        })
    }

    const TODAY: (i32, u32, u32) = (2025, 6, 10);

    fn run(query: &SearchQuery, items: Vec<Item>) -> Vec<SearchHit> {
        AttributeFilterChain::new(query, ymd(TODAY.0, TODAY.1, TODAY.2)).apply(hits(items))
    }

    #[test]
    fn test_category_filter() {
        let items = vec![
            Item::new("a", ItemKind::Activity, "Trail").with_category("Outdoor"),
            Item::new("b", ItemKind::Activity, "Gym").with_category("Indoor"),
            Item::new("c", ItemKind::Activity, "Park").with_category("Outdoor"),
            Item::new("d", ItemKind::Activity, "Museum").with_category("Educational & Enrichment"),
            Item::new("e", ItemKind::Activity, "Unknown"),
        ];
        let query = SearchQuery::builder().category("Outdoor Fun").build().unwrap();
        assert_eq!(ids(&run(&query, items)), ["a", "c"]);
    }

    #[test]
    fn test_free_only_requires_explicit_true() {
        let items = vec![
            Item::new("a", ItemKind::Activity, "Free").with_free(true),
            Item::new("b", ItemKind::Activity, "Paid").with_free(false),
            Item::new("c", ItemKind::Activity, "Unspecified"),
        ];
        let query = SearchQuery::builder().free_only(true).build().unwrap();
        assert_eq!(ids(&run(&query, items)), ["a"]);
    }

    #[test]
    fn test_age_filter() {
        let items = vec![
            Item::new("all", ItemKind::Activity, "x").with_age_range("All Ages"),
            Item::new("none", ItemKind::Activity, "y"),
            Item::new("kids", ItemKind::Activity, "z").with_age_range("4-12"),
        ];
        let adults = SearchQuery::builder().age_band(AgeBand::Adults).build().unwrap();
        assert_eq!(ids(&run(&adults, items.clone())), ["all", "none"]);
        let kids = SearchQuery::builder().age_band(AgeBand::Kids).build().unwrap();
        assert_eq!(ids(&run(&kids, items)), ["all", "none", "kids"]);
    }

    #[test]
    fn test_event_type_multi_select() {
        let items = vec![
            Item::new("a", ItemKind::Event, "x").with_event_type("Festival"),
            Item::new("b", ItemKind::Event, "y").with_event_type("Storytime"),
            Item::new("c", ItemKind::Event, "z"),
        ];
        let query = SearchQuery::builder()
            .event_types(["Festival", "Concert"])
            .build()
            .unwrap();
        assert_eq!(ids(&run(&query, items)), ["a"]);
    }

    #[test]
    fn test_past_events_hidden_unless_requested() {
        let items = vec![
            dated_event("past", "6/1/2025"),
            dated_event("future", "6/20/2025"),
            Item::new("recurring-past", ItemKind::Event, "r").with_schedule(EventSchedule {
                date_text: Some("5/1/2025".into()),
                recurring: true,
                ..EventSchedule::default()
            }),
        ];
        let upcoming = SearchQuery::default();
        assert_eq!(ids(&run(&upcoming, items.clone())), ["future", "recurring-past"]);

        let all = SearchQuery::builder()
            .date_window(DateWindow::All)
            .show_past(true)
            .build()
            .unwrap();
        assert_eq!(ids(&run(&all, items.clone())), ["past", "future", "recurring-past"]);

        let all_hidden = SearchQuery::builder().date_window(DateWindow::All).build().unwrap();
        assert_eq!(ids(&run(&all_hidden, items)), ["future", "recurring-past"]);
    }

    #[test]
    fn test_date_windows() {
        let items = vec![
            dated_event("today", "2025-06-10"),
            dated_event("in-3-days", "Jun 13, 2025"),
            dated_event("in-20-days", "6/30/2025"),
            dated_event("next-month", "7/10/2025"),
            Item::new("undated", ItemKind::Event, "u"),
            Item::new("weekly", ItemKind::Event, "w").with_schedule(EventSchedule {
                frequency: Some("Weekly".into()),
                ..EventSchedule::default()
            }),
        ];
        let window = |w| SearchQuery::builder().date_window(w).build().unwrap();

        assert_eq!(ids(&run(&window(DateWindow::Today), items.clone())), ["today", "weekly"]);
        assert_eq!(
            ids(&run(&window(DateWindow::Week), items.clone())),
            ["today", "in-3-days", "weekly"]
        );
        assert_eq!(
            ids(&run(&window(DateWindow::Month), items.clone())),
            ["today", "in-3-days", "in-20-days", "weekly"]
        );
        assert_eq!(
            ids(&run(&window(DateWindow::Upcoming), items)),
            ["today", "in-3-days", "in-20-days", "next-month", "undated", "weekly"]
        );
    }

    #[test]
    fn test_recurring_events_in_every_current_window() {
        let recurring = |id: &str, text: &str| {
            Item::new(id, ItemKind::Event, id).with_schedule(EventSchedule {
                date_text: Some(text.to_string()),
                recurring: true,
                ..EventSchedule::default()
            })
        };
        let items = vec![
            recurring("started", "Starting 5/1/2025, every Tuesday"),
            recurring("starts-later", "Starting 9/1/2025, every Tuesday"),
            dated_event("one-off-later", "9/1/2025"),
        ];
        let window = |w| SearchQuery::builder().date_window(w).build().unwrap();

        for w in [DateWindow::Today, DateWindow::Week, DateWindow::Month] {
            assert_eq!(
                ids(&run(&window(w), items.clone())),
                ["started", "starts-later"],
                "{w:?}"
            );
        }
        assert_eq!(
            ids(&run(&window(DateWindow::Upcoming), items)),
            ["started", "starts-later", "one-off-later"]
        );
    }

    #[test]
    fn test_activities_ignore_date_window() {
        let items = vec![Item::new("a", ItemKind::Activity, "Park")];
        let query = SearchQuery::builder().date_window(DateWindow::Today).build().unwrap();
        assert_eq!(ids(&run(&query, items)), ["a"]);
    }
}
