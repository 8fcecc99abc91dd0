use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use std::fmt;

use crate::validation::ValidationError;

/// RFC3339 instant normalized to UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Parses an RFC3339 timestamp. An explicit offset (`Z` or `±hh:mm`) is required.
    pub fn parse(text: &str) -> Result<Self, ValidationError> {
        DateTime::parse_from_rfc3339(text.trim())
            .map(|dt| Self(dt.with_timezone(&Utc)))
            .map_err(|_| ValidationError::InvalidTimestamp(text.to_string()))
    }

    /// Current time truncated to whole seconds.
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Wraps a UTC datetime, dropping sub-second precision.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        let secs = dt.timestamp();
        Self(DateTime::from_timestamp(secs, 0).unwrap_or(dt))
    }

    /// Underlying datetime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Renders as `YYYY-MM-DDTHH:MM:SSZ`.
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_rfc3339())
    }
}
