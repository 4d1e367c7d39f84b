//! Environment gate timestamp encoding
//!
//! Older cache files carry the timestamp as Unix milliseconds, newer ones
//! may use RFC 3339 text. Both are always readable; the configured
//! `TimestampFormat` only decides how it is written back.

use crate::settings::TimestampFormat;
use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A gate timestamp as stored on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredTimestamp {
    /// Milliseconds since the Unix epoch
    UnixMillis(i64),
    /// RFC 3339 date-time text
    Rfc3339(String),
}

impl StoredTimestamp {
    /// Encode `at` in the requested format
    ///
    /// Unrecognized formats fall back to Unix milliseconds.
    pub fn encode(at: DateTime<Utc>, format: &TimestampFormat) -> Self {
        match format {
            TimestampFormat::Rfc3339 => {
                StoredTimestamp::Rfc3339(at.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            TimestampFormat::UnixMillis | TimestampFormat::Unrecognized(_) => {
                StoredTimestamp::UnixMillis(at.timestamp_millis())
            }
        }
    }

    /// Decode to a UTC instant
    ///
    /// Malformed values decode to `None`, which the gate treats as
    /// "never bootstrapped".
    pub fn decode(&self) -> Option<DateTime<Utc>> {
        match self {
            StoredTimestamp::UnixMillis(ms) => Utc.timestamp_millis_opt(*ms).single(),
            StoredTimestamp::Rfc3339(text) => DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }
}
