use serde::{Deserialize, Serialize};

use crate::models::Position;

/// Body accepted from the browser; both fields are optional so a missing
/// coordinate can be answered with the backend's own message.
#[derive(Debug, Default, Deserialize)]
pub struct LocationRequest {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

impl LocationRequest {
    pub fn position(&self) -> Option<Position> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => Some(Position { lat, lng }),
            _ => None,
        }
    }
}

/// Body forwarded to the backend.
#[derive(Debug, Serialize)]
pub struct UpstreamLocationBody {
    pub lat: f64,
    pub lng: f64,
}

impl From<Position> for UpstreamLocationBody {
    fn from(value: Position) -> Self {
        Self {
            lat: value.lat,
            lng: value.lng,
        }
    }
}
