use chrono::{DateTime, Utc};

use hindsight_core::errors::TemporalError;

/// A half-open time interval: inclusive of `start`, exclusive of `end`, UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, TemporalError> {
        if start >= end {
            return Err(TemporalError::InvalidInterval {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
        Ok(Self { start, end })
    }

    /// Widen both ends by `days`, used by the temporal strategy's
    /// broadened-overlap check.
    pub fn broaden(&self, days: i64) -> Interval {
        Interval {
            start: self.start - chrono::Duration::days(days),
            end: self.end + chrono::Duration::days(days),
        }
    }

    /// Half-open overlap: `a.start < b.end && b.start < a.end`.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }
}
