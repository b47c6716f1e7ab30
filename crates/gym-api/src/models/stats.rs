use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::database::{HourBucketRow, HourOfDayRow};

pub const DEFAULT_WINDOW_HOURS: i64 = 24;
pub const MIN_WINDOW_HOURS: i64 = 1;
pub const MAX_WINDOW_HOURS: i64 = 168;

pub const HOUR_OF_DAY_MODE: &str = "hour_of_day";

/// Which aggregate `/stats` should produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsMode {
    /// All-time starts grouped by hour of day (0-23)
    HourOfDay,
    /// Starts in the trailing window, grouped per calendar hour
    Recent { hours: i64 },
}

impl StatsMode {
    /// `mode=hour_of_day` wins; otherwise the leading integer of `hours` is
    /// clamped to [1, 168], falling back to 24 when there is none.
    pub fn from_params(mode: Option<&str>, hours: Option<&str>) -> Self {
        if mode.map(str::trim) == Some(HOUR_OF_DAY_MODE) {
            return StatsMode::HourOfDay;
        }

        let hours = hours
            .and_then(leading_integer)
            .unwrap_or(DEFAULT_WINDOW_HOURS)
            .clamp(MIN_WINDOW_HOURS, MAX_WINDOW_HOURS);

        StatsMode::Recent { hours }
    }

    /// Earliest start time inside the recent window
    pub fn window_start(hours: i64, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::hours(hours)
    }
}

/// Optional sign plus leading digits (`"12.5"` -> 12, `"5abc"` -> 5).
/// Values past the i64 range saturate so they still clamp to the window bounds.
fn leading_integer(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let (negative, rest) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    let digits = &rest[..digits_len];
    let value = match digits.parse::<i64>() {
        Ok(value) => value,
        Err(_) => i64::MAX,
    };

    Some(if negative { -value } else { value })
}

/// Aggregated stats as returned to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StatsReport {
    HourOfDay {
        mode: &'static str,
        rows: Vec<HourOfDayRow>,
    },
    Recent {
        hours: i64,
        rows: Vec<HourBucketRow>,
    },
}
