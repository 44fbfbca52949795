use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::models::Building;

/// Time the list gets to lay out before scrolling to a marker's entry.
pub const SCROLL_SETTLE_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionSource {
    Marker,
    List,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrollRequest {
    pub target: String,
    pub delay_ms: u64,
}

/// Single-selection accordion: at most one building is expanded.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    active: Option<String>,
}

impl Selection {
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn is_expanded(&self, code: &str) -> bool {
        self.active.as_deref() == Some(code)
    }

    pub fn select(&mut self, code: &str, source: SelectionSource) -> Option<ScrollRequest> {
        match source {
            SelectionSource::Marker => Some(self.select_from_marker(code)),
            SelectionSource::List => {
                self.select_from_list(code);
                None
            }
        }
    }

    /// Choosing the open entry again collapses it; an empty code collapses too.
    pub fn select_from_list(&mut self, code: &str) {
        if code.is_empty() || self.is_expanded(code) {
            self.active = None;
        } else {
            self.active = Some(code.to_string());
        }
    }

    pub fn select_from_marker(&mut self, code: &str) -> ScrollRequest {
        self.active = Some(code.to_string());
        ScrollRequest {
            target: code.to_string(),
            delay_ms: SCROLL_SETTLE_DELAY.as_millis() as u64,
        }
    }

    /// Drops the selection when its building is no longer in the data.
    pub fn retain(&mut self, buildings: &[Building]) {
        let vanished = self
            .active
            .as_deref()
            .is_some_and(|active| !buildings.iter().any(|b| b.code == active));
        if vanished {
            self.active = None;
        }
    }
}
