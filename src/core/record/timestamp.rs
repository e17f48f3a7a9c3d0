//! Lenient timestamp decoding for the hourly table.
//!
//! Upstream exports vary: the energy-data API emits ISO-8601 strings with or without an offset,
//! while tables dumped with pandas' default settings carry epoch milliseconds. The offset is kept
//! so that the rows can be ordered as instants while the reported times stay on the source's wall
//! clock. Naive strings and epoch milliseconds are read as UTC.

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

const NAIVE_FORMATS: [&str; 4] =
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Parse a textual timestamp, keeping its offset.
pub fn parse(text: &str) -> Option<DateTime<FixedOffset>> {
    let text = text.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Some(timestamp);
    }
    OFFSET_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NAIVE_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
                .map(|timestamp| timestamp.and_utc().fixed_offset())
        })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    EpochMillis(i64),
    Text(String),
}

pub fn deserialize<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<DateTime<FixedOffset>, D::Error> {
    match RawTimestamp::deserialize(deserializer)? {
        RawTimestamp::EpochMillis(millis) => DateTime::from_timestamp_millis(millis)
            .map(|timestamp| timestamp.fixed_offset())
            .ok_or_else(|| D::Error::custom(format!("epoch milliseconds out of range: {millis}"))),
        RawTimestamp::Text(text) => {
            parse(&text).ok_or_else(|| D::Error::custom(format!("unrecognized timestamp: `{text}`")))
        }
    }
}

pub fn serialize<S: Serializer>(
    timestamp: &DateTime<FixedOffset>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&timestamp.format("%Y-%m-%dT%H:%M:%S%:z"))
}
