use std::fmt;

use serde::{Deserialize, Serialize};

/// Availability of a slot, room or building.
///
/// Variants are declared in priority order so `Ord` picks the "best" status
/// when aggregating: `Available > Upcoming > Unavailable > Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "serde_json::Value")]
pub enum Status {
    #[default]
    Unknown,
    Unavailable,
    Upcoming,
    Available,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Available => "available",
            Status::Upcoming => "upcoming",
            Status::Unavailable => "unavailable",
            Status::Unknown => "unknown",
        }
    }

    /// Lenient parse used for status strings coming off the wire.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "available" => Status::Available,
            "upcoming" => Status::Upcoming,
            "unavailable" => Status::Unavailable,
            _ => Status::Unknown,
        }
    }
}

/// Non-string values (null, numbers, objects) are `Unknown`.
impl From<serde_json::Value> for Status {
    fn from(value: serde_json::Value) -> Self {
        value.as_str().map(Status::parse).unwrap_or_default()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
