//! Month-name recognition, shared by the bare-month and "between X and Y"
//! grammars.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use regex::Regex;
use std::sync::OnceLock;

use crate::interval::Interval;

const MONTHS: &[(&str, &str, u32)] = &[
    ("january", "jan", 1),
    ("february", "feb", 2),
    ("march", "mar", 3),
    ("april", "apr", 4),
    ("may", "may", 5),
    ("june", "jun", 6),
    ("july", "jul", 7),
    ("august", "aug", 8),
    ("september", "sep", 9),
    ("october", "oct", 10),
    ("november", "nov", 11),
    ("december", "dec", 12),
]
;

/// Resolve a case-insensitive month token (full or 3-letter abbreviation)
/// to its 1-12 number.
pub fn month_number(token: &str) -> Option<u32> {
    let lower = token.to_lowercase();
    MONTHS
        .iter()
        .find(|(full, abbr, _)| *full == lower || *abbr == lower)
        .map(|(_, _, n)| *n)
}

fn month_pattern() -> &'static str {
    "january|february|march|april|may|june|july|august|september|october|november|december|jan|feb|mar|apr|jun|jul|aug|sep|oct|nov|dec"
}

fn single_month_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"(?i)\b({})\b(?:\s+(\d{{4}}))?", month_pattern())).unwrap()
    })
}

/// The half-open interval `[month 1st 00:00, next month 1st 00:00)` in UTC.
pub fn month_interval(year: i32, month: u32) -> Interval {
    let start = Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0).unwrap();
    let (end_year, end_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    let end = Utc.with_ymd_and_hms(end_year, end_month, 1, 0, 0, 0).unwrap();
    Interval { start, end }
}

/// Find a single bare month mention (optionally followed by a 4-digit
/// year) and resolve it to the nearest past occurrence when no year is
/// given.
pub fn parse_bare_month(query: &str, now: DateTime<Utc>) -> Option<Interval> {
    let caps = single_month_regex().captures(query)?;
    let month = month_number(caps.get(1)?.as_str())?;
    let year = match caps.get(2) {
        Some(y) => y.as_str().parse::<i32>().ok()?,
        None => nearest_past_year(now, month),
    };
    Some(month_interval(year, month))
}

/// The year that makes `month` the most recent occurrence at or before
/// `now`.
pub fn nearest_past_year(now: DateTime<Utc>, month: u32) -> i32 {
    if month <= now.month() {
        now.year()
    } else {
        now.year() - 1
    }
}
