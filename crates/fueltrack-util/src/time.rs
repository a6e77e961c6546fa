//! Time utilities for fueltrack
//!
//! Record timestamps are stored as epoch milliseconds. This module converts
//! between those and calendar time, and provides the sortable year-month key
//! used for monthly expense buckets.
//!
//! # Mock Time for Development
//!
//! In debug builds, the `FUELTRACK_MOCK_TIME` environment variable can be set
//! to override the system time used when stamping new records. This is useful
//! for generating sample data "in the past".
//!
//! Format: `YYYY-MM-DD HH:MM:SS` (e.g., `2025-12-25 14:30:00`)

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Environment variable name for mock time (debug builds only)
pub const MOCK_TIME_ENV_VAR: &str = "FUELTRACK_MOCK_TIME";

/// Format accepted by [`MOCK_TIME_ENV_VAR`]
pub const MOCK_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Cached mock time offset from the real time when the process started.
/// This allows mock time to advance naturally.
static MOCK_TIME_OFFSET: OnceLock<Option<chrono::Duration>> = OnceLock::new();

#[allow(clippy::disallowed_methods)] // Wraps Local::now()
fn get_mock_time_offset() -> Option<chrono::Duration> {
    *MOCK_TIME_OFFSET.get_or_init(|| {
        #[cfg(debug_assertions)]
        {
            if let Ok(mock_time_str) = std::env::var(MOCK_TIME_ENV_VAR) {
                match parse_mock_time(&mock_time_str) {
                    Some(mock_dt) => {
                        let offset = mock_dt.signed_duration_since(chrono::Local::now());
                        tracing::info!(
                            mock_time = %mock_time_str,
                            offset_secs = offset.num_seconds(),
                            "Mock time enabled"
                        );
                        return Some(offset);
                    }
                    None => {
                        tracing::warn!(
                            mock_time = %mock_time_str,
                            expected_format = MOCK_TIME_FORMAT,
                            "Invalid mock time"
                        );
                    }
                }
            }
            None
        }
        #[cfg(not(debug_assertions))]
        {
            None
        }
    })
}

/// Parse a mock time string in the local timezone
pub fn parse_mock_time(s: &str) -> Option<DateTime<Local>> {
    let naive = NaiveDateTime::parse_from_str(s, MOCK_TIME_FORMAT).ok()?;
    Local.from_local_datetime(&naive).single()
}

/// Returns whether mock time is currently active.
pub fn is_mock_time_active() -> bool {
    get_mock_time_offset().is_some()
}

/// Get the current local time, respecting mock time settings in debug builds.
#[allow(clippy::disallowed_methods)] // The wrapper that provides mock time support
pub fn now() -> DateTime<Local> {
    let real_now = chrono::Local::now();

    if let Some(offset) = get_mock_time_offset() {
        real_now + offset
    } else {
        real_now
    }
}

/// Current time as epoch milliseconds
pub fn now_millis() -> i64 {
    now().timestamp_millis()
}

/// Convert epoch milliseconds into a datetime in the given timezone.
/// Returns `None` for out-of-range values.
pub fn datetime_from_millis<Tz: TimeZone>(millis: i64, tz: &Tz) -> Option<DateTime<Tz>> {
    tz.timestamp_millis_opt(millis).single()
}

/// Format an epoch-millis timestamp as a local `YYYY-MM-DD` date.
/// Out-of-range values format as an empty string.
pub fn format_date(millis: i64) -> String {
    datetime_from_millis(millis, &Local)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Format an epoch-millis timestamp as a short chart label (`Mar 14`).
pub fn format_short_date(millis: i64) -> String {
    datetime_from_millis(millis, &Local)
        .map(|dt| dt.format("%b %-d").to_string())
        .unwrap_or_default()
}

/// Calendar month key, sortable as an integer (`year * 12 + month0`).
///
/// The display label is derived separately with [`YearMonth::label`] so that
/// bucket ordering never depends on formatted month names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct YearMonth(i32);

impl YearMonth {
    /// Build a key from a year and a 1-based month
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self(year * 12 + month as i32 - 1))
        } else {
            None
        }
    }

    pub fn from_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self {
        Self(dt.year() * 12 + dt.month0() as i32)
    }

    /// Bucket an epoch-millis timestamp by its calendar month in `tz`
    pub fn from_millis_in<Tz: TimeZone>(millis: i64, tz: &Tz) -> Option<Self> {
        datetime_from_millis(millis, tz).map(|dt| Self::from_datetime(&dt))
    }

    /// Inverse of [`YearMonth::key`]
    pub fn from_key(key: i32) -> Self {
        Self(key)
    }

    /// The raw sortable key
    pub fn key(self) -> i32 {
        self.0
    }

    pub fn year(self) -> i32 {
        self.0.div_euclid(12)
    }

    /// 1-based month
    pub fn month(self) -> u32 {
        self.0.rem_euclid(12) as u32 + 1
    }

    /// Display label such as `Jan 2025`
    pub fn label(self) -> String {
        NaiveDate::from_ymd_opt(self.year(), self.month(), 1)
            .map(|d| d.format("%b %Y").to_string())
            .unwrap_or_else(|| self.to_string())
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_now_returns_time() {
        let t = now();
        assert!(t.year() >= 2020);
        assert!(t.year() <= 2100);
    }

    #[test]
    fn test_mock_time_env_var_name() {
        assert_eq!(MOCK_TIME_ENV_VAR, "FUELTRACK_MOCK_TIME");
    }

    #[test]
    fn test_parse_mock_time() {
        let dt = parse_mock_time("2025-12-25 14:30:00").unwrap();
        assert_eq!(dt.year(), 2025);
        assert_eq!(dt.month(), 12);
        assert_eq!(dt.day(), 25);

        for invalid in ["2025-12-25", "2025-12-25T14:30:00", "", "not a date"] {
            assert!(parse_mock_time(invalid).is_none(), "{invalid} should not parse");
        }
    }

    #[test]
    fn test_datetime_from_millis() {
        let dt = datetime_from_millis(0, &Utc).unwrap();
        assert_eq!(dt.year(), 1970);
        assert!(datetime_from_millis(i64::MAX, &Utc).is_none());
    }

    #[test]
    fn test_year_month_ordering() {
        let dec_2024 = YearMonth::new(2024, 12).unwrap();
        let jan_2025 = YearMonth::new(2025, 1).unwrap();
        let feb_2025 = YearMonth::new(2025, 2).unwrap();

        assert!(dec_2024 < jan_2025);
        assert!(jan_2025 < feb_2025);
        assert_eq!(jan_2025.key() - dec_2024.key(), 1);
        assert_eq!(YearMonth::from_key(jan_2025.key() - 1), dec_2024);
    }

    #[test]
    fn test_year_month_parts_and_label() {
        let ym = YearMonth::new(2025, 3).unwrap();
        assert_eq!(ym.year(), 2025);
        assert_eq!(ym.month(), 3);
        assert_eq!(ym.label(), "Mar 2025");
        assert_eq!(ym.to_string(), "2025-03");

        assert!(YearMonth::new(2025, 0).is_none());
        assert!(YearMonth::new(2025, 13).is_none());
    }

    #[test]
    fn test_year_month_from_millis() {
        // 2025-01-31T23:30:00Z
        let millis = Utc
            .with_ymd_and_hms(2025, 1, 31, 23, 30, 0)
            .unwrap()
            .timestamp_millis();
        let ym = YearMonth::from_millis_in(millis, &Utc).unwrap();
        assert_eq!(ym, YearMonth::new(2025, 1).unwrap());

        // Same instant one hour east lands in February
        let plus_one = chrono::FixedOffset::east_opt(3600).unwrap();
        let ym = YearMonth::from_millis_in(millis, &plus_one).unwrap();
        assert_eq!(ym, YearMonth::new(2025, 2).unwrap());
    }

    #[test]
    fn test_year_month_serializes_as_key() {
        let ym = YearMonth::new(2025, 1).unwrap();
        let json = serde_json::to_string(&ym).unwrap();
        assert_eq!(json, (2025 * 12).to_string());
    }
}
