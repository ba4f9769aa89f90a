//! Inclusive block-timestamp window

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// `[start, end]` in milliseconds since the Unix epoch, both ends inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: i64,
    pub end: i64,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: start.timestamp_millis(),
            end: end.timestamp_millis(),
        }
    }

    pub fn from_millis(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Window covering every representable block timestamp
    pub fn unbounded() -> Self {
        Self {
            start: i64::MIN,
            end: i64::MAX,
        }
    }

    pub fn contains(&self, millis: i64) -> bool {
        self.start <= millis && millis <= self.end
    }

    /// Whether `[min, max]` shares at least one instant with the window
    pub fn overlaps(&self, min: i64, max: i64) -> bool {
        min <= self.end && max >= self.start
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use crate::constants::millis_to_iso_date_string;

        write!(
            f,
            "[{}, {}]",
            millis_to_iso_date_string(self.start),
            millis_to_iso_date_string(self.end)
        )
    }
}

/// Parses a UTC date given on the command line.
///
/// Accepts RFC 3339 (`2024-08-10T16:24:59Z`, `2024-08-10 16:24:59.68+00:00`) as
/// well as naive `YYYY-MM-DDTHH:MM:SS[.f]` and `YYYY-MM-DD`, which are taken to
/// be UTC.
pub fn parse_utc_date(s: &str) -> anyhow::Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(date_time) = DateTime::parse_from_rfc3339(s) {
        return Ok(date_time.with_timezone(&Utc));
    }
    if let Ok(date_time) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Ok(date_time.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }
    anyhow::bail!("unrecognized date {s:?}, expected YYYY-MM-DDTHH:MM:SS (UTC)")
}
