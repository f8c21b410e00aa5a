//! Timestamp helpers.
//!
//! Panel listings report account creation as Unix seconds; reports expose it
//! as RFC3339.

use chrono::{DateTime, NaiveDate, Utc};

/// Convert a Unix timestamp, auto-detecting seconds vs milliseconds.
pub fn from_unix(ts: i64) -> Option<DateTime<Utc>> {
    // Values above 10^11 only make sense as milliseconds.
    if ts > 100_000_000_000 {
        DateTime::from_timestamp_millis(ts)
    } else {
        DateTime::from_timestamp(ts, 0)
    }
}

/// Parse a calendar day written as `YYYY-MM-DD`.
pub fn parse_day(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// `Option<DateTime<Utc>>` as RFC3339 or `null`.
pub mod option {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    use super::from_unix;

    pub fn serialize<S>(dt: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match dt {
            Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    /// Accepts RFC3339, a Unix timestamp, or `null`.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Timestamp {
            Text(String),
            Unix(i64),
        }

        match Option::<Timestamp>::deserialize(deserializer)? {
            Some(Timestamp::Text(s)) => DateTime::parse_from_rfc3339(&s)
                .map(|dt| Some(dt.with_timezone(&Utc)))
                .map_err(|e| Error::custom(format!("Invalid RFC3339 timestamp: {e}"))),
            Some(Timestamp::Unix(ts)) => from_unix(ts)
                .map(Some)
                .ok_or_else(|| Error::custom("Invalid Unix timestamp")),
            None => Ok(None),
        }
    }
}
