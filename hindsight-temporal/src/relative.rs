//! "last/this/next {year,week,month}" grammar.

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use regex::Regex;
use std::sync::OnceLock;

use crate::interval::Interval;

fn regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\b(last|this|next)\s+(year|week|month)\b").unwrap())
}

pub fn parse_relative_window(query: &str, now: DateTime<Utc>) -> Option<Interval> {
    let caps = regex().captures(query)?;
    let qualifier = caps.get(1)?.as_str().to_lowercase();
    let unit = caps.get(2)?.as_str().to_lowercase();

    let interval = match unit.as_str() {
        "year" => year_window(now, &qualifier),
        "week" => week_window(now, &qualifier),
        "month" => month_window(now, &qualifier),
        _ => return None,
    };
    Some(interval)
}

fn year_window(now: DateTime<Utc>, qualifier: &str) -> Interval {
    let offset: i32 = match qualifier {
        "last" => -1,
        "next" => 1,
        _ => 0,
    };
    let start = Utc
        .with_ymd_and_hms(now.year() + offset, 1, 1, 0, 0, 0)
        .unwrap();
    let end = Utc
        .with_ymd_and_hms(now.year() + offset + 1, 1, 1, 0, 0, 0)
        .unwrap();
    Interval { start, end }
}

fn month_window(now: DateTime<Utc>, qualifier: &str) -> Interval {
    let this_month_start = Utc.with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0).unwrap();
    let offset: i64 = match qualifier {
        "last" => -1,
        "next" => 1,
        _ => 0,
    };
    let start = if offset >= 0 {
        this_month_start + chrono::Months::new(offset as u32)
    } else {
        this_month_start - chrono::Months::new((-offset) as u32)
    };
    let end = start + chrono::Months::new(1);
    Interval { start, end }
}

fn week_window(now: DateTime<Utc>, qualifier: &str) -> Interval {
    let days_from_monday = now.weekday().num_days_from_monday() as i64;
    let this_week_start = (now - Duration::days(days_from_monday))
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc();
    let offset: i64 = match qualifier {
        "last" => -1,
        "next" => 1,
        _ => 0,
    };
    let start = this_week_start + Duration::weeks(offset);
    let end = start + Duration::weeks(1);
    Interval { start, end }
}
