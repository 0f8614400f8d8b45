//! Normalization of raw order timestamps into calendar dates.
//!
//! Source datasets carry `order_date` either as a plain date or as a full
//! timestamp. Analytics only ever look at the calendar day, so every accepted
//! form is truncated to a `NaiveDate` at load time.

use crate::error::CoreError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serializer};

/// The canonical on-disk representation of an order date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parses a raw `order_date` cell, discarding any time-of-day component.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS[.fff]`, `YYYY-MM-DDTHH:MM:SS[.fff]`
/// and RFC 3339 timestamps. For offset-carrying timestamps the date is the one
/// written in the source, not the UTC date.
pub fn parse_order_date(raw: &str) -> Result<NaiveDate, CoreError> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        return Ok(date);
    }

    for format in DATETIME_FORMATS {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(timestamp.date());
        }
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|timestamp| timestamp.naive_local().date())
        .map_err(|_| CoreError::UnrecognizedDate(raw.to_string()))
}

pub(crate) fn deserialize_order_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_order_date(&raw).map_err(serde::de::Error::custom)
}

pub(crate) fn serialize_order_date<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&date.format(DATE_FORMAT))
}
