/// Data Models Module
///
/// This module defines the core data structures used throughout the application.
/// An `AttackerRecord` is one parsed line of the DShield feed, in the exact shape
/// it is persisted to MongoDB.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One attacker entry from a single ingestion run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackerRecord {
    pub ip: String,
    /// `None` when the feed's count column is not an integer
    pub attacks: Option<i64>,
    pub country: String,
    #[serde(with = "iso8601")]
    pub ingested_at: DateTime<Utc>,
}

impl AttackerRecord {
    pub fn new(ip: impl Into<String>, attacks: Option<i64>, country: impl Into<String>, ingested_at: DateTime<Utc>) -> Self {
        Self { ip: ip.into(), attacks, country: country.into(), ingested_at }
    }
}

/// Format an ingestion timestamp the way it is stored
///
/// Fixed microsecond precision with a `Z` suffix, so lexical order on the stored
/// string matches chronological order.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

/// Serde adapter storing `DateTime<Utc>` as a fixed-width ISO-8601 string
pub mod iso8601 {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_timestamp(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw).map(|ts| ts.with_timezone(&Utc)).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_is_fixed_width_utc() {
        let ts = Utc.with_ymd_and_hms(2026, 10, 16, 8, 0, 0).unwrap();
        assert_eq!(format_timestamp(&ts), "2026-10-16T08:00:00.000000Z");
    }

    #[test]
    fn test_record_serializes_null_attacks() {
        let ts = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let record = AttackerRecord::new("5.6.7.8", None, "CN", ts);

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["ip"], "5.6.7.8");
        assert!(value["attacks"].is_null());
        assert_eq!(value["country"], "CN");
        assert_eq!(value["ingested_at"], "2026-01-02T03:04:05.000000Z");

        let back: AttackerRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }
}
