use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use super::Status;

/// One free interval for a room on the current day.
///
/// Times are kept as received so a malformed value never fails the whole
/// payload; they are parsed on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    #[serde(rename = "StartTime", default, deserialize_with = "lenient_time")]
    pub start_time: String,
    #[serde(rename = "EndTime", default, deserialize_with = "lenient_time")]
    pub end_time: String,
    #[serde(rename = "Status", default)]
    pub status: Status,
}

impl Slot {
    pub fn new(start_time: &str, end_time: &str, status: Status) -> Self {
        Self {
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
            status,
        }
    }

    pub fn start(&self) -> Option<NaiveTime> {
        parse_time_of_day(&self.start_time)
    }

    pub fn end(&self) -> Option<NaiveTime> {
        parse_time_of_day(&self.end_time)
    }
}

/// Keeps whatever was sent as text; a missing or non-string time becomes a
/// value that never parses, so the slot resolves as unavailable.
fn lenient_time<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(text)) => Ok(text),
        Some(other) => {
            warn!("slot time is not a string: {}", other);
            Ok(other.to_string())
        }
        None => {
            warn!("slot time is null");
            Ok(String::new())
        }
    }
}

/// Accepts `HH:MM:SS` (what the backend sends) and `HH:MM`.
pub fn parse_time_of_day(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
}
