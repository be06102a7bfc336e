//! Serde helpers for API timestamps.
//!
//! The marketplace API emits naive ISO-8601 datetimes (no offset) for most
//! records, but offset-qualified RFC 3339 strings also occur. Both are accepted
//! and normalized to UTC; values are always written back as RFC 3339.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses an API timestamp, treating offset-less values as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("invalid timestamp '{}'", raw))
}

pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_rfc3339())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(D::Error::custom)
}

/// Same as the parent module for `Option<DateTime<Utc>>` fields.
pub mod option {
    use super::parse_timestamp;
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(value) => serializer.serialize_some(&value.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => parse_timestamp(&raw).map(Some).map_err(D::Error::custom),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_naive_with_fraction() {
        let parsed = parse_timestamp("2025-03-14T09:26:53.589793").unwrap();
        assert_eq!(parsed.year(), 2025);
        assert_eq!(parsed.hour(), 9);
        assert_eq!(parsed.nanosecond(), 589_793_000);
    }

    #[test]
    fn test_parse_naive_without_fraction() {
        let parsed = parse_timestamp("2025-03-14T09:26:53").unwrap();
        assert_eq!(parsed.second(), 53);
    }

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let parsed = parse_timestamp("2025-03-14T11:26:53+02:00").unwrap();
        assert_eq!(parsed.hour(), 9);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_err());
    }
}
