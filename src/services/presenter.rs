use chrono::NaiveTime;
use serde::Serialize;

use crate::config::AppConfig;
use crate::models::{Building, Status, slot::parse_time_of_day};

/// Visual token a status maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Green,
    Amber,
    Red,
    Gray,
}

impl Tone {
    pub fn label_class(&self) -> &'static str {
        match self {
            Tone::Green => "bg-green-800/20 text-green-300",
            Tone::Amber => "bg-yellow-800/20 text-yellow-300",
            Tone::Red => "bg-red-800/20 text-red-300",
            Tone::Gray => "bg-zinc-800/20 text-zinc-300",
        }
    }

    pub fn indicator_class(&self) -> &'static str {
        match self {
            Tone::Green => "bg-green-400",
            Tone::Amber => "bg-yellow-400",
            Tone::Red => "bg-red-400",
            Tone::Gray => "bg-zinc-400",
        }
    }

    pub fn marker_class(&self) -> &'static str {
        match self {
            Tone::Green => "marker marker-green",
            Tone::Amber => "marker marker-amber",
            Tone::Red => "marker marker-red",
            Tone::Gray => "marker marker-gray",
        }
    }
}

pub fn marker_style(status: Status) -> Tone {
    match status {
        Status::Available => Tone::Green,
        Status::Upcoming => Tone::Amber,
        Status::Unavailable => Tone::Red,
        Status::Unknown => Tone::Gray,
    }
}

/// Same table for raw strings; anything unrecognised renders gray.
pub fn marker_style_for(status: &str) -> Tone {
    marker_style(Status::parse(status))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub status: Status,
    pub text: &'static str,
    pub indicator_style_class: &'static str,
}

/// Map legend, in the order it is drawn.
pub fn legend() -> Vec<LegendEntry> {
    [Status::Unavailable, Status::Upcoming, Status::Available]
        .into_iter()
        .map(|status| LegendEntry {
            status,
            text: legend_text(status),
            indicator_style_class: marker_style(status).indicator_class(),
        })
        .collect()
}

/// Map legend copy.
pub fn legend_text(status: Status) -> &'static str {
    match status {
        Status::Available => "open now",
        Status::Upcoming => "opening soon",
        Status::Unavailable => "unavailable",
        Status::Unknown => "unknown",
    }
}

/// `14:05` -> `2:05 PM`. Fixed to en-US so output does not depend on the host.
pub fn format_time(raw: &str) -> String {
    match parse_time_of_day(raw) {
        Some(time) => format_time_of_day(time),
        None => raw.to_string(),
    }
}

pub fn format_time_of_day(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomView {
    pub display: String,
    pub indicator_style_class: &'static str,
    pub slot_text: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildingView {
    pub code: String,
    pub title: String,
    pub label_text: &'static str,
    pub label_style_class: &'static str,
    pub expanded: bool,
    pub rooms: Vec<RoomView>,
    /// Shown in place of the room list when the building has no rooms.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<String>,
}

pub fn present(building: &Building) -> BuildingView {
    let rooms = building
        .rooms
        .iter()
        .map(|(room_id, room)| RoomView {
            display: format!("{} {}", building.code, room_id),
            indicator_style_class: marker_style(room.room_status).indicator_class(),
            slot_text: room
                .slots
                .iter()
                .map(|slot| format!("{} - {}", format_time(&slot.start_time), format_time(&slot.end_time)))
                .collect(),
        })
        .collect();

    BuildingView {
        code: building.code.clone(),
        title: format!("{} - {}", building.code, building.name),
        label_text: building.status.as_str(),
        label_style_class: marker_style(building.status).label_class(),
        expanded: false,
        rooms,
        empty_message: None,
    }
}

/// Copy shown instead of an empty list.
#[derive(Debug, Clone, PartialEq)]
pub struct EmptyStateCopy {
    pub message: String,
    pub closing_time: NaiveTime,
}

impl EmptyStateCopy {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            message: config.empty_state_message.clone(),
            closing_time: config.closing_time,
        }
    }

    pub fn message_at(&self, now: NaiveTime) -> String {
        if now >= self.closing_time {
            format!("{} after {}", self.message, format_time_of_day(self.closing_time))
        } else {
            self.message.clone()
        }
    }
}
