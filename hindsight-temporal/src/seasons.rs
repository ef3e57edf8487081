//! Meteorological season grammar: spring/summer/autumn(fall)/winter,
//! optionally qualified by last/this/next.

use chrono::{DateTime, TimeZone, Utc};
use regex::Regex;
use std::sync::OnceLock;

use crate::interval::Interval;
use crate::months::nearest_past_year;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Qualifier {
    Last,
    This,
    Next,
    Bare,
}

fn season_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(last|this|next)?\s*(spring|summer|autumn|fall|winter)\b").unwrap()
    })
}

fn start_month(season: &str) -> u32 {
    match season.to_lowercase().as_str() {
        "spring" => 3,
        "summer" => 6,
        "autumn" | "fall" => 9,
        "winter" => 12,
        _ => unreachable!("regex only matches the four season names"),
    }
}

/// The interval `[year/month/1, +3 months)` in UTC, used for every season
/// occurrence.
fn season_span(year: i32, month: u32) -> Interval {
    let start = Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0).unwrap();
    let end = start + chrono::Months::new(3);
    Interval { start, end }
}

pub fn parse_season(query: &str, now: DateTime<Utc>) -> Option<Interval> {
    let caps = season_regex().captures(query)?;
    let qualifier = match caps.get(1).map(|m| m.as_str().to_lowercase()).as_deref() {
        Some("last") => Qualifier::Last,
        Some("this") => Qualifier::This,
        Some("next") => Qualifier::Next,
        _ => Qualifier::Bare,
    };
    let month = start_month(caps.get(2)?.as_str());
    let ref_year = nearest_past_year(now, month);

    let year = match qualifier {
        Qualifier::This | Qualifier::Bare => ref_year,
        Qualifier::Last => ref_year - 1,
        Qualifier::Next => ref_year + 1,
    };
    Some(season_span(year, month))
}
