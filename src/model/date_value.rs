use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Error for malformed stored date strings
#[derive(Debug, thiserror::Error)]
#[error("not an ISO-8601 date or date-time: {0:?}")]
pub struct ParseDateError(pub String);

/// A date as stored on a task: either a bare calendar date or a date with
/// a time of day. Local wall clock, no offset. The ISO text form is the
/// storage format; the presence of `T` discriminates the variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateValue {
    /// `2024-01-15`
    Date(NaiveDate),
    /// `2024-01-15T14:30:00`
    DateTime(NaiveDateTime),
}

impl DateValue {
    /// The calendar date of either variant
    pub fn date(self) -> NaiveDate {
        match self {
            DateValue::Date(d) => d,
            DateValue::DateTime(dt) => dt.date(),
        }
    }

    /// The time of day, if this value carries one
    pub fn time(self) -> Option<NaiveTime> {
        match self {
            DateValue::Date(_) => None,
            DateValue::DateTime(dt) => Some(dt.time()),
        }
    }

    pub fn has_time(self) -> bool {
        matches!(self, DateValue::DateTime(_))
    }
}

impl From<NaiveDate> for DateValue {
    fn from(d: NaiveDate) -> Self {
        DateValue::Date(d)
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            DateValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S")),
        }
    }
}

impl FromStr for DateValue {
    type Err = ParseDateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.contains('T') {
            // Fractional seconds are accepted on input and dropped on output
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                .map(DateValue::DateTime)
                .map_err(|_| ParseDateError(s.to_string()))
        } else {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map(DateValue::Date)
                .map_err(|_| ParseDateError(s.to_string()))
        }
    }
}

impl Serialize for DateValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
