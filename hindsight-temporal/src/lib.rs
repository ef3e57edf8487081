//! The temporal expression parser: `parse(query, now) ->
//! Option<Interval>`, active only when the query carries a recognisable
//! time expression. Pure: `now` is always passed in explicitly, never read
//! from the clock, so the parser is trivially idempotent and testable.

mod interval;
mod months;
mod ranges;
mod relative;
mod seasons;

pub use interval::Interval;

use chrono::{DateTime, Utc};

/// Parse a time expression out of `query`, resolved relative to `now`.
/// Returns `None` when the query carries no recognisable time expression;
/// this directly gates the temporal retrieval strategy.
///
/// Tried in order of specificity: ISO-8601 ranges, "between X and Y",
/// "last/this/next {year,week,month}", seasons, then bare month names.
/// The first grammar to match wins.
pub fn parse(query: &str, now: DateTime<Utc>) -> Option<Interval> {
    ranges::parse_iso_range(query)
        .or_else(|| ranges::parse_between_months(query, now))
        .or_else(|| relative::parse_relative_window(query, now))
        .or_else(|| seasons::parse_season(query, now))
        .or_else(|| months::parse_bare_month(query, now))
}
