//! Free-text heuristics over uncontrolled catalog strings.
//!
//! Age ranges and event dates are typed by hand in the source data, so matching
//! is substring and pattern based. Known ambiguous inputs that are accepted as
//! is:
//!
//! - `"21+"` matches [`AgeBand::Adults`], as does anything containing `"adult"`.
//! - `"10-30"` contains `"0-3"` and therefore matches [`AgeBand::Toddler`].
//! - `"All Ages"` matches every band.
//! - A date pattern naming an impossible day (`2/30/2024`) is skipped, and the
//!   next pattern or text is tried.

use chrono::{Months, NaiveDate};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use socialspot_data::Item;

use super::AgeBand;

const TODDLER: &[&str] = &["0-3", "toddler", "infant", "all ages"];
const KIDS: &[&str] = &["4-12", "kids", "children", "all ages"];
const TEENS: &[&str] = &["13-18", "teen", "youth", "all ages"];
const ADULTS: &[&str] = &["18+", "adult", "21+", "all ages"];

/// Lowercase substrings that select an item for `band`. Empty for
/// [`AgeBand::All`].
pub fn age_band_keywords(band: AgeBand) -> &'static [&'static str] {
    match band {
        AgeBand::All => &[],
        AgeBand::Toddler => TODDLER,
        AgeBand::Kids => KIDS,
        AgeBand::Teens => TEENS,
        AgeBand::Adults => ADULTS,
    }
}

/// Whether an item's age range text admits `band`.
///
/// A missing age range is never a mismatch.
pub fn matches_age_band(age_range: Option<&str>, band: AgeBand) -> bool {
    if band == AgeBand::All {
        return true;
    }
    let Some(age_range) = age_range else {
        return true;
    };
    let lower = age_range.to_lowercase();
    age_band_keywords(band).iter().any(|k| lower.contains(k))
}

static SLASH_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,2})/(\d{1,2})/(\d{4})").expect("slash date pattern"));
static MONTH_NAME_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+(\d{1,2}),?\s+(\d{4})")
        .expect("month name date pattern")
});
static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4})-(\d{2})-(\d{2})").expect("iso date pattern"));

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

fn num<T: std::str::FromStr>(caps: &Captures<'_>, i: usize) -> Option<T> {
    caps.get(i)?.as_str().parse().ok()
}

fn slash_date(caps: &Captures<'_>) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(num(caps, 3)?, num(caps, 1)?, num(caps, 2)?)
}

fn month_name_date(caps: &Captures<'_>) -> Option<NaiveDate> {
    let month = caps.get(1)?.as_str().to_lowercase();
    let month = MONTHS.iter().position(|m| *m == month)? as u32 + 1;
    NaiveDate::from_ymd_opt(num(caps, 3)?, month, num(caps, 2)?)
}

fn iso_date(caps: &Captures<'_>) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(num(caps, 1)?, num(caps, 2)?, num(caps, 3)?)
}

/// Find the first recognizable calendar date in free text.
///
/// Patterns are tried in order: `M/D/YYYY`, `Mon D, YYYY` (full or abbreviated
/// month name, any case), `YYYY-MM-DD`.
pub fn parse_date_text(text: &str) -> Option<NaiveDate> {
    SLASH_DATE
        .captures(text)
        .and_then(|caps| slash_date(&caps))
        .or_else(|| {
            MONTH_NAME_DATE
                .captures(text)
                .and_then(|caps| month_name_date(&caps))
        })
        .or_else(|| ISO_DATE.captures(text).and_then(|caps| iso_date(&caps)))
}

/// The calendar date an event is treated as falling on.
///
/// The date text is tried before the schedule text. A recurring event with no
/// parseable date counts as happening `today`.
pub fn event_date(item: &Item, today: NaiveDate) -> Option<NaiveDate> {
    let schedule = item.schedule.as_ref()?;
    [schedule.date_text.as_deref(), schedule.schedule_text.as_deref()]
        .into_iter()
        .flatten()
        .find_map(parse_date_text)
        .or_else(|| item.is_recurring().then_some(today))
}

/// First day after the month-long window starting at `today`.
pub fn month_after(today: NaiveDate) -> NaiveDate {
    today
        .checked_add_months(Months::new(1))
        .unwrap_or(NaiveDate::MAX)
}

#[cfg(test)]
mod tests {
    use socialspot_data::{EventSchedule, ItemKind};

    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_all_ages_matches_every_band() {
        for band in [AgeBand::Toddler, AgeBand::Kids, AgeBand::Teens, AgeBand::Adults] {
            assert!(matches_age_band(Some("All Ages"), band), "{band:?}");
            assert!(matches_age_band(None, band), "{band:?}");
        }
    }

    #[test]
    fn test_band_keywords() {
        assert!(matches_age_band(Some("Ages 0-3"), AgeBand::Toddler));
        assert!(matches_age_band(Some("Infants welcome"), AgeBand::Toddler));
        assert!(matches_age_band(Some("4-12"), AgeBand::Kids));
        assert!(matches_age_band(Some("Children"), AgeBand::Kids));
        assert!(matches_age_band(Some("Teens 13-18"), AgeBand::Teens));
        assert!(matches_age_band(Some("YOUTH league"), AgeBand::Teens));
        assert!(matches_age_band(Some("Adults 18+"), AgeBand::Adults));
    }

    #[test]
    fn test_band_mismatches() {
        assert!(!matches_age_band(Some("4-12"), AgeBand::Adults));
        assert!(!matches_age_band(Some("4-12"), AgeBand::Toddler));
        assert!(!matches_age_band(Some("Teens 13-18"), AgeBand::Kids));
        assert!(!matches_age_band(Some(""), AgeBand::Kids));
    }

    #[test]
    fn test_known_ambiguities() {
        assert!(matches_age_band(Some("21+"), AgeBand::Adults));
        assert!(matches_age_band(Some("Ages 10-30"), AgeBand::Toddler));
    }

    #[test]
    fn test_unset_band_keeps_everything() {
        assert!(matches_age_band(Some("4-12"), AgeBand::All));
        assert!(age_band_keywords(AgeBand::All).is_empty());
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date_text("12/7/2024"), Some(ymd(2024, 12, 7)));
        assert_eq!(parse_date_text("Saturday, 3/15/2025 at 10am"), Some(ymd(2025, 3, 15)));
        assert_eq!(parse_date_text("Dec 7, 2024"), Some(ymd(2024, 12, 7)));
        assert_eq!(parse_date_text("december 7 2024"), Some(ymd(2024, 12, 7)));
        assert_eq!(parse_date_text("Sept. 21, 2025"), Some(ymd(2025, 9, 21)));
        assert_eq!(parse_date_text("2024-12-07T10:00"), Some(ymd(2024, 12, 7)));
    }

    #[test]
    fn test_parse_date_rejects_nonsense() {
        assert_eq!(parse_date_text("Every Saturday"), None);
        assert_eq!(parse_date_text("Fridays (June-August)"), None);
        assert_eq!(parse_date_text("2/30/2024"), None);
        assert_eq!(parse_date_text("2/30/2024 or 2024-03-01"), Some(ymd(2024, 3, 1)));
    }

    #[test]
    fn test_event_date_sources() {
        let today = ymd(2025, 6, 1);
        let from_schedule = Item::new("a", ItemKind::Event, "Fair").with_schedule(EventSchedule {
            date_text: Some("TBD".into()),
            schedule_text: Some("Opens 2025-06-14".into()),
            ..EventSchedule::default()
        });
        assert_eq!(event_date(&from_schedule, today), Some(ymd(2025, 6, 14)));

        let recurring = Item::new("b", ItemKind::Event, "Storytime").with_schedule(EventSchedule {
            date_text: Some("Every Saturday".into()),
            recurring: true,
            ..EventSchedule::default()
        });
        assert_eq!(event_date(&recurring, today), Some(today));

        let undated = Item::new("c", ItemKind::Event, "Pop-up");
        assert_eq!(event_date(&undated, today), None);
    }

    #[test]
    fn test_month_after() {
        assert_eq!(month_after(ymd(2025, 1, 15)), ymd(2025, 2, 15));
        assert_eq!(month_after(ymd(2025, 1, 31)), ymd(2025, 2, 28));
        assert_eq!(month_after(ymd(2025, 12, 10)), ymd(2026, 1, 10));
    }
}
