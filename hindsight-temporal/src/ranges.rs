//! "between X and Y" (month, optionally month+year) and ISO-8601 date
//! ranges.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use regex::Regex;
use std::sync::OnceLock;

use crate::interval::Interval;
use crate::months::{month_interval, month_number, nearest_past_year};

fn between_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)between\s+([a-z]+)(?:\s+(\d{4}))?\s+and\s+([a-z]+)(?:\s+(\d{4}))?",
        )
        .unwrap()
    })
}

fn iso_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(\d{4}-\d{2}-\d{2})\s*(?:to|through|and)\s*(\d{4}-\d{2}-\d{2})").unwrap()
    })
}

/// "between March and May", "between March 2023 and May 2023", "between
/// March and May 2023".
pub fn parse_between_months(query: &str, now: DateTime<Utc>) -> Option<Interval> {
    let caps = between_regex().captures(query)?;
    let start_month = month_number(caps.get(1)?.as_str())?;
    let end_month = month_number(caps.get(3)?.as_str())?;
    let start_year_lit: Option<i32> = caps.get(2).and_then(|m| m.as_str().parse().ok());
    let end_year_lit: Option<i32> = caps.get(4).and_then(|m| m.as_str().parse().ok());

    let (start_year, end_year) = match (start_year_lit, end_year_lit) {
        (Some(sy), Some(ey)) => (sy, ey),
        (Some(sy), None) => (sy, sy),
        (None, Some(ey)) => (ey, ey),
        (None, None) => {
            let sy = nearest_past_year(now, start_month);
            let ey = if end_month < start_month { sy + 1 } else { sy };
            (sy, ey)
        }
    };

    let start = month_interval(start_year, start_month).start;
    let end = month_interval(end_year, end_month).end;
    Interval::new(start, end).ok()
}

/// ISO-8601 ranges: "2023-06-01 to 2023-08-31" (end date inclusive per the
/// written text; converted to the half-open boundary by adding one day).
pub fn parse_iso_range(query: &str) -> Option<Interval> {
    let caps = iso_regex().captures(query)?;
    let start_date: NaiveDate = caps.get(1)?.as_str().parse().ok()?;
    let end_date: NaiveDate = caps.get(2)?.as_str().parse().ok()?;

    let start = start_date.and_hms_opt(0, 0, 0)?.and_utc();
    let end = (end_date + Duration::days(1)).and_hms_opt(0, 0, 0)?.and_utc();
    Interval::new(start, end).ok()
}
