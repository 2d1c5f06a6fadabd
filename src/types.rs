//! Common types used throughout the connector
//!
//! Caller-supplied inputs: the credentials collaborator and the date range
//! used to filter orders by creation date.

use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Date format accepted by the Magento `created_at` filter
pub const FILTER_DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// Credentials
// ============================================================================

/// Source of the API user name and key used for `login`.
///
/// The connector never creates or validates credentials; it only reads them
/// once, when the session is acquired.
pub trait CredentialsProvider: Send + Sync {
    /// API user name
    fn username(&self) -> &str;

    /// API key (Magento calls the password field `apiKey`)
    fn password(&self) -> &str;
}

/// Plain username / password pair
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// API user name
    pub username: String,
    /// API key
    pub password: String,
}

impl Credentials {
    /// Create a new credentials pair
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl CredentialsProvider for Credentials {
    fn username(&self) -> &str {
        &self.username
    }

    fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

// ============================================================================
// Date Range
// ============================================================================

/// Inclusive creation-date filter.
///
/// Only the date part is significant; both bounds are sent to Magento as
/// `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a range, rejecting `start > end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::invalid_range(format!(
                "start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Create a range from timestamps, truncating both to their UTC date
    pub fn from_timestamps(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        Self::new(start.date_naive(), end.date_naive())
    }

    /// First day included in the range
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day included in the range
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Start bound as sent in the `from` filter
    pub fn start_param(&self) -> String {
        self.start.format(FILTER_DATE_FORMAT).to_string()
    }

    /// End bound as sent in the `to` filter
    pub fn end_param(&self) -> String {
        self.end.format(FILTER_DATE_FORMAT).to_string()
    }

    /// Whether the timestamp's date lies within `[start, end]`
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        let date = timestamp.date_naive();
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start_param(), self.end_param())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_range_formats_bounds() {
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap();
        assert_eq!(range.start_param(), "2024-01-01");
        assert_eq!(range.end_param(), "2024-01-31");
        assert_eq!(range.to_string(), "2024-01-01..=2024-01-31");
    }

    #[test]
    fn test_date_range_rejects_inverted_bounds() {
        let err = DateRange::new(date(2024, 2, 1), date(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, Error::InvalidDateRange { .. }));
    }

    #[test]
    fn test_date_range_single_day() {
        let range = DateRange::new(date(2024, 1, 5), date(2024, 1, 5)).unwrap();
        let ts = Utc.with_ymd_and_hms(2024, 1, 5, 23, 59, 59).unwrap();
        assert!(range.contains(ts));
    }

    #[test]
    fn test_date_range_contains_is_inclusive_and_truncated() {
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap();
        assert!(range.contains(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
        assert!(range.contains(Utc.with_ymd_and_hms(2024, 1, 31, 18, 30, 0).unwrap()));
        assert!(!range.contains(Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap()));
        assert!(!range.contains(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_date_range_from_timestamps() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 2, 8, 0, 0).unwrap();
        let range = DateRange::from_timestamps(start, end).unwrap();
        assert_eq!(range.start(), date(2024, 3, 1));
        assert_eq!(range.end(), date(2024, 3, 2));
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials::new("api-user", "s3cret");
        let debug = format!("{creds:?}");
        assert!(debug.contains("api-user"));
        assert!(!debug.contains("s3cret"));
        assert_eq!(creds.username(), "api-user");
        assert_eq!(creds.password(), "s3cret");
    }
}
