//! Timestamp utilities
//!
//! All timestamps are persisted as fixed-width RFC 3339 text
//! (microseconds, `Z` suffix), so stored values sort lexically in time order.

use chrono::{DateTime, Duration, SecondsFormat, Utc};

use crate::{Error, Result};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Current UTC time formatted for storage
pub fn now_rfc3339() -> String {
    to_rfc3339(now())
}

/// Format a timestamp for storage
pub fn to_rfc3339(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored timestamp
pub fn parse_rfc3339(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Internal(format!("Failed to parse timestamp '{}': {}", value, e)))
}

/// Timestamp `days` from now
pub fn days_from_now(days: i64) -> DateTime<Utc> {
    now() + Duration::days(days)
}
