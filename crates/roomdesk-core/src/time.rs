//! Time helpers for reservations.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use std::fmt;
use thiserror::Error;

/// Start and end of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeSpan {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeSpan {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> chrono::Duration {
        self.end - self.start
    }

    /// Returns a span of the same length starting at `start`.
    pub fn moved_to(&self, start: DateTime<Utc>) -> Self {
        Self::new(start, start + self.duration())
    }
}

impl fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = self.start.with_timezone(&Local);
        let end = self.end.with_timezone(&Local);
        if start.date_naive() == end.date_naive() {
            write!(f, "{} {}-{}", start.format("%a %b %-d"), start.format("%H:%M"), end.format("%H:%M"))
        } else {
            write!(f, "{} - {}", start.format("%a %b %-d %H:%M"), end.format("%a %b %-d %H:%M"))
        }
    }
}

/// Formats a date the way the calendar labels days in messages, e.g. `May 6`.
pub fn format_short_date<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    dt.format("%b %-d").to_string()
}

/// Error returned by [`parse_timestamp`].
#[derive(Debug, Error)]
pub enum TimeParseError {
    #[error("unrecognized timestamp `{0}` (expected RFC 3339 or YYYY-MM-DDTHH:MM)")]
    Format(String),
    #[error("local time `{0}` is ambiguous or does not exist")]
    Ambiguous(String),
}

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Parses an RFC 3339 timestamp, or a naive timestamp in local time.
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>, TimeParseError> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .ok_or_else(|| TimeParseError::Format(input.to_string()))?;

    Local
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| TimeParseError::Ambiguous(input.to_string()))
}
