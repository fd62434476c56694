//! Date and time field parsing plus serde adapters for the stored formats.
//!
//! Dates are stored as `YYYY-MM-DD`, times as `HH:MM`. Optional fields use the
//! empty string for "not set", which is how they appear in the stored JSON.

use chrono::{NaiveDate, NaiveTime};

use crate::error::{Error, Result};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

/// Parse an ISO `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|error| Error::InvalidInput(format!("invalid date '{value}': {error}")))
}

/// Parse an `HH:MM` clock time. Seconds are accepted and dropped.
pub fn parse_clock_time(value: &str) -> Result<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|error| Error::InvalidInput(format!("invalid time '{value}': {error}")))
}

/// Parse an optional date where blank input means "not set".
pub fn parse_optional_date(value: &str) -> Result<Option<NaiveDate>> {
    if value.trim().is_empty() {
        Ok(None)
    } else {
        parse_date(value).map(Some)
    }
}

/// Parse an optional time where blank input means "not set".
pub fn parse_optional_clock_time(value: &str) -> Result<Option<NaiveTime>> {
    if value.trim().is_empty() {
        Ok(None)
    } else {
        parse_clock_time(value).map(Some)
    }
}

pub(crate) mod optional_date {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(date) => serializer.collect_str(&date.format(super::DATE_FORMAT)),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(raw) => super::parse_optional_date(&raw).map_err(de::Error::custom),
        }
    }
}

pub(crate) mod optional_clock_time {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(
        value: &Option<NaiveTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(time) => serializer.collect_str(&time.format(super::TIME_FORMAT)),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveTime>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(raw) => super::parse_optional_clock_time(&raw).map_err(de::Error::custom),
        }
    }
}
