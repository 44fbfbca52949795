use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use super::{Slot, Status};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Room {
    #[serde(default, deserialize_with = "lenient_slots")]
    pub slots: Vec<Slot>,
    #[serde(default)]
    pub room_status: Status,
}

/// A building as returned by the availability backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    #[serde(rename = "building")]
    pub name: String,
    #[serde(rename = "building_code")]
    pub code: String,
    #[serde(rename = "building_status", default)]
    pub status: Status,
    #[serde(default, deserialize_with = "lenient_rooms")]
    pub rooms: BTreeMap<String, Room>,
    #[serde(default, deserialize_with = "lenient_coords", skip_serializing_if = "Option::is_none")]
    pub coords: Option<Coords>,
    #[serde(default, deserialize_with = "lenient_distance", skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

impl Building {
    /// Parses a backend body. Only a body that is not a JSON array fails;
    /// entries that are not a usable building are skipped.
    pub fn parse_list(body: &str) -> Result<Vec<Building>, serde_json::Error> {
        let entries: Vec<serde_json::Value> = serde_json::from_str(body)?;
        let mut buildings = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            match serde_json::from_value::<Building>(entry) {
                Ok(building) => buildings.push(building),
                Err(e) => warn!("skipping malformed building #{}: {}", index, e),
            }
        }
        Ok(buildings)
    }

    pub fn new(code: &str, name: &str) -> Self {
        Self {
            name: name.to_string(),
            code: code.to_string(),
            status: Status::Unknown,
            rooms: BTreeMap::new(),
            coords: None,
            distance: None,
        }
    }

    pub fn with_room(mut self, room_id: &str, slots: Vec<Slot>) -> Self {
        self.rooms.insert(
            room_id.to_string(),
            Room {
                slots,
                room_status: Status::Unknown,
            },
        );
        self
    }

    pub fn with_coords(mut self, lat: f64, lng: f64) -> Self {
        self.coords = Some(Coords { lat, lng });
        self
    }
}

/// Wire order is `[lat, lng]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(into = "[f64; 2]")]
pub struct Coords {
    pub lat: f64,
    pub lng: f64,
}

impl Coords {
    /// Order expected by the map widget.
    pub fn lng_lat(&self) -> [f64; 2] {
        [self.lng, self.lat]
    }
}

impl From<Coords> for [f64; 2] {
    fn from(value: Coords) -> Self {
        [value.lat, value.lng]
    }
}

/// Anything other than two finite numbers is dropped instead of failing the payload.
fn lenient_coords<'de, D>(deserializer: D) -> Result<Option<Coords>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(None);
    };

    let parsed = raw.as_array().and_then(|items| match items.as_slice() {
        [lat, lng] => Some(Coords {
            lat: lat.as_f64()?,
            lng: lng.as_f64()?,
        }),
        _ => None,
    });

    match parsed {
        Some(coords) if coords.lat.is_finite() && coords.lng.is_finite() => Ok(Some(coords)),
        _ => {
            warn!("ignoring malformed coords: {}", raw);
            Ok(None)
        }
    }
}

/// `null` is an empty list; entries that are not slots are skipped.
fn lenient_slots<'de, D>(deserializer: D) -> Result<Vec<Slot>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    let items = match raw {
        None => return Ok(Vec::new()),
        Some(serde_json::Value::Array(items)) => items,
        Some(other) => {
            warn!("ignoring slots that are not a list: {}", other);
            return Ok(Vec::new());
        }
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<Slot>(item) {
            Ok(slot) => Some(slot),
            Err(e) => {
                warn!("skipping malformed slot: {}", e);
                None
            }
        })
        .collect())
}

/// `null` is an empty map; rooms that cannot be read are skipped.
fn lenient_rooms<'de, D>(deserializer: D) -> Result<BTreeMap<String, Room>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    let entries = match raw {
        None => return Ok(BTreeMap::new()),
        Some(serde_json::Value::Object(entries)) => entries,
        Some(other) => {
            warn!("ignoring rooms that are not a map: {}", other);
            return Ok(BTreeMap::new());
        }
    };

    let mut rooms = BTreeMap::new();
    for (room_id, value) in entries {
        match serde_json::from_value::<Room>(value) {
            Ok(room) => {
                rooms.insert(room_id, room);
            }
            Err(e) => warn!("skipping malformed room {}: {}", room_id, e),
        }
    }
    Ok(rooms)
}

fn lenient_distance<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| value.as_f64()))
}

/// Browser-supplied position of the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"[{
        "building": "Valders Hall of Science",
        "building_code": "VAL",
        "building_status": "available",
        "rooms": {
            "206": {
                "slots": [{"StartTime":"09:00:00","EndTime":"10:00:00","Status":"available"}],
                "room_status": "available"
            }
        },
        "coords": [43.3125, -91.803],
        "distance": 0
    }, {
        "building": "Main Building",
        "building_code": "MAIN",
        "building_status": "closed",
        "rooms": {},
        "coords": "somewhere"
    }]"#;

    #[test]
    fn parses_backend_payload() {
        let buildings: Vec<Building> = serde_json::from_str(PAYLOAD).unwrap();
        assert_eq!(buildings.len(), 2);

        let val = &buildings[0];
        assert_eq!(val.code, "VAL");
        assert_eq!(val.status, Status::Available);
        assert_eq!(val.rooms["206"].slots.len(), 1);
        assert_eq!(val.coords.unwrap().lng_lat(), [-91.803, 43.3125]);

        let main = &buildings[1];
        assert_eq!(main.status, Status::Unknown);
        assert!(main.coords.is_none());
    }

    #[test]
    fn malformed_slot_data_does_not_drop_other_buildings() {
        let body = r#"[{
            "building": "Valders Hall of Science",
            "building_code": "VAL",
            "rooms": {
                "206": {
                    "slots": [
                        {"StartTime": null, "EndTime": "10:00:00", "Status": "available"},
                        {"StartTime": "11:00:00", "EndTime": "12:00:00", "Status": null},
                        "not a slot"
                    ],
                    "room_status": 7
                },
                "301": null
            },
            "coords": [43.3125, -91.803]
        }, {
            "building": "Olin Hall",
            "building_code": "OLIN",
            "rooms": {"102": {"slots": null, "room_status": "upcoming"}},
            "distance": "far"
        }, {
            "building_code": 12
        }]"#;

        let buildings = Building::parse_list(body).unwrap();
        assert_eq!(buildings.len(), 2);

        let val = &buildings[0];
        assert_eq!(val.code, "VAL");
        assert_eq!(val.rooms.len(), 1);
        let room = &val.rooms["206"];
        assert_eq!(room.slots.len(), 2);
        assert!(room.slots[0].start().is_none());
        assert_eq!(room.slots[1].status, Status::Unknown);
        assert_eq!(room.room_status, Status::Unknown);

        let olin = &buildings[1];
        assert_eq!(olin.code, "OLIN");
        assert!(olin.rooms["102"].slots.is_empty());
        assert!(olin.distance.is_none());
    }

    #[test]
    fn non_array_body_is_an_error() {
        assert!(Building::parse_list(r#"{"error": "down"}"#).is_err());
        assert!(Building::parse_list("<html>").is_err());
    }

    #[test]
    fn coords_serialize_as_lat_lng_pair() {
        let building = Building::new("VAL", "Valders").with_coords(43.3, -91.8);
        let json = serde_json::to_value(&building).unwrap();
        assert_eq!(json["coords"], serde_json::json!([43.3, -91.8]));
        assert_eq!(json["building_code"], "VAL");
    }
}
