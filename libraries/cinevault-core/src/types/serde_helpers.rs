//! Lenient wire-format helpers.
//!
//! The catalog API is loosely typed: dates arrive either as full timestamps
//! (`2010-07-16T00:00:00.000Z`) or plain dates, and director death years may
//! be `null`, missing, a number, or a stringified number. Anything that does
//! not parse is treated as absent rather than failing the whole response.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a wire date, accepting RFC 3339 timestamps and plain `YYYY-MM-DD`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .ok()
        .or_else(|| NaiveDate::parse_from_str(raw, DATE_FORMAT).ok())
}

/// `#[serde(with = "optional_date")]` for `Option<NaiveDate>` fields.
pub mod optional_date {
    use super::*;

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&date.format(DATE_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(raw)) => parse_date(&raw),
            _ => None,
        })
    }
}

/// Deserialize a year that may be a number, a numeric string, or garbage.
pub fn lenient_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(year_from_value))
}

fn year_from_value(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .and_then(|y| i32::try_from(y).ok()),
        Value::String(s) => s.trim().parse::<i32>().ok(),
        _ => None,
    }
}
