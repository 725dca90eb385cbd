//! Time grains and hit buckets for the aggregate report
//!
//! A grain pairs a bucket size with a fixed lookback window and a label
//! format, matching the three views of the hit chart.

use chrono::{DateTime, Datelike, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Time bucket size for hit aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeGrain {
    /// Hour buckets over the last day
    Hourly,
    /// Day buckets over the last 30 days
    Daily,
    /// Month buckets over the last 365 days
    Monthly,
}

impl TimeGrain {
    /// Parse a grain name
    ///
    /// Unknown names are an error, never a silent no-op: an unrecognized
    /// grain must not produce an unconstrained aggregate query.
    pub fn parse(s: &str) -> Result<Self, StoreError> {
        match s.trim().to_lowercase().as_str() {
            "hourly" | "hour" => Ok(Self::Hourly),
            "daily" | "day" => Ok(Self::Daily),
            "monthly" | "month" => Ok(Self::Monthly),
            _ => Err(StoreError::UnknownGrain(s.to_string())),
        }
    }

    /// Canonical grain name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Monthly => "monthly",
        }
    }

    /// How far back this grain's report reaches
    pub fn lookback(&self) -> Duration {
        match self {
            Self::Hourly => Duration::days(1),
            Self::Daily => Duration::days(30),
            Self::Monthly => Duration::days(365),
        }
    }

    /// Truncate a timestamp to the start of its bucket
    pub fn truncate(&self, dt: DateTime<Utc>) -> DateTime<Utc> {
        let date = dt.date_naive();
        let truncated = match self {
            Self::Hourly => date.and_hms_opt(dt.hour(), 0, 0),
            Self::Daily => date.and_hms_opt(0, 0, 0),
            Self::Monthly => date.with_day(1).and_then(|d| d.and_hms_opt(0, 0, 0)),
        };
        truncated.map(|t| t.and_utc()).unwrap_or(dt)
    }

    /// Human-readable bucket label ("9 AM", "5 Mar 2024", "Mar 2024")
    pub fn label(&self, bucket: DateTime<Utc>) -> String {
        match self {
            Self::Hourly => bucket.format("%-I %p").to_string(),
            Self::Daily => bucket.format("%-d %b %Y").to_string(),
            Self::Monthly => bucket.format("%b %Y").to_string(),
        }
    }

    /// MySQL `DATE_FORMAT` pattern producing the bucket label
    pub fn mysql_label_format(&self) -> &'static str {
        match self {
            Self::Hourly => "%l %p",
            Self::Daily => "%e %b %Y",
            Self::Monthly => "%b %Y",
        }
    }

    /// MySQL `DATE_FORMAT` pattern identifying the bucket for `GROUP BY`
    ///
    /// The hourly pattern includes the date so that the same hour of two
    /// different days never collapses into one bucket.
    pub fn mysql_group_format(&self) -> &'static str {
        match self {
            Self::Hourly => "%Y-%m-%d %H",
            Self::Daily => "%Y-%m-%d",
            Self::Monthly => "%Y-%m",
        }
    }
}

/// Distinct-user count for one time bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitBucket {
    /// Bucket start as epoch seconds; buckets sort ascending on this
    pub bucket: i64,
    /// Formatted bucket label for chart axes
    pub label: String,
    /// Number of distinct users active in the bucket
    pub users: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse() {
        assert_eq!(TimeGrain::parse("hourly").unwrap(), TimeGrain::Hourly);
        assert_eq!(TimeGrain::parse("HOUR").unwrap(), TimeGrain::Hourly);
        assert_eq!(TimeGrain::parse("daily").unwrap(), TimeGrain::Daily);
        assert_eq!(TimeGrain::parse("monthly").unwrap(), TimeGrain::Monthly);
        assert_eq!(TimeGrain::parse(" month ").unwrap(), TimeGrain::Monthly);
    }

    #[test]
    fn test_parse_unknown() {
        assert!(matches!(
            TimeGrain::parse("weekly"),
            Err(StoreError::UnknownGrain(_))
        ));
        assert!(TimeGrain::parse("").is_err());
    }

    #[test]
    fn test_truncate() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 5, 14, 37, 22).unwrap();

        assert_eq!(
            TimeGrain::Hourly.truncate(dt),
            Utc.with_ymd_and_hms(2024, 3, 5, 14, 0, 0).unwrap()
        );
        assert_eq!(
            TimeGrain::Daily.truncate(dt),
            Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap()
        );
        assert_eq!(
            TimeGrain::Monthly.truncate(dt),
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_labels() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 5, 9, 0, 0).unwrap();
        assert_eq!(TimeGrain::Hourly.label(dt), "9 AM");
        assert_eq!(TimeGrain::Daily.label(dt), "5 Mar 2024");
        assert_eq!(TimeGrain::Monthly.label(dt), "Mar 2024");

        let pm = Utc.with_ymd_and_hms(2024, 3, 5, 15, 0, 0).unwrap();
        assert_eq!(TimeGrain::Hourly.label(pm), "3 PM");
    }

    #[test]
    fn test_lookback() {
        assert_eq!(TimeGrain::Hourly.lookback(), Duration::days(1));
        assert_eq!(TimeGrain::Daily.lookback(), Duration::days(30));
        assert_eq!(TimeGrain::Monthly.lookback(), Duration::days(365));
    }
}
