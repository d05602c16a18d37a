//! Wire types for the `feeds.json` response.
//!
//! ThingSpeak stores every field as text, so numbers usually arrive as
//! JSON strings. Some writers send raw numbers. A field the writer skipped
//! comes back as `null`, which makes the whole entry unusable; a field key
//! that is omitted entirely reads as zero.

use chrono::{DateTime, Utc};
use greenpulse_core::SensorReading;
use serde::Deserialize;
use serde_json::Value;

use crate::ThingSpeakError;

/// Value used for a field whose key is absent.
const MISSING_FIELD_VALUE: f64 = 0.0;

/// Top-level `feeds.json` body. The `channel` metadata object is ignored.
#[derive(Debug, Deserialize)]
pub struct ChannelFeed {
    #[serde(default)]
    pub feeds: Vec<FeedEntry>,
}

/// One channel entry.
#[derive(Debug, Deserialize)]
pub struct FeedEntry {
    pub created_at: Option<String>,
    pub entry_id: Option<u64>,
    pub field1: Option<Value>,
    pub field2: Option<Value>,
    pub field3: Option<Value>,
    pub field4: Option<Value>,
}

impl ChannelFeed {
    /// Convert the first entry into a reading.
    pub fn latest(&self) -> Result<SensorReading, ThingSpeakError> {
        let entry = self.feeds.first().ok_or(ThingSpeakError::NoFeeds)?;
        entry.to_reading()
    }
}

impl FeedEntry {
    pub fn to_reading(&self) -> Result<SensorReading, ThingSpeakError> {
        Ok(SensorReading {
            temperature: parse_field("field1", self.field1.as_ref())?,
            humidity: parse_field("field2", self.field2.as_ref())?,
            soil_moisture: parse_field("field3", self.field3.as_ref())?,
            light: parse_field("field4", self.field4.as_ref())?,
            observed_at: self.created_at.as_deref().and_then(parse_timestamp),
        })
    }
}

fn parse_field(field: &'static str, value: Option<&Value>) -> Result<f64, ThingSpeakError> {
    let invalid = |value: String| ThingSpeakError::InvalidField { field, value };

    match value {
        None => Ok(MISSING_FIELD_VALUE),
        Some(Value::Null) => Err(invalid("null".to_string())),
        Some(Value::Number(n)) => n.as_f64().ok_or_else(|| invalid(n.to_string())),
        Some(Value::String(s)) => s.trim().parse::<f64>().map_err(|_| invalid(s.clone())),
        Some(other) => Err(invalid(other.to_string())),
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}
