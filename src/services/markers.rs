use std::collections::HashSet;

use serde::Serialize;
use tracing::warn;

use super::presenter::marker_style;
use crate::models::{Building, Position};

pub const USER_MARKER_CLASS: &str = "marker marker-user";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "code", rename_all = "lowercase")]
pub enum MarkerId {
    Building(String),
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerSpec {
    pub id: MarkerId,
    /// Map widget order.
    pub lng_lat: [f64; 2],
    pub class_name: &'static str,
}

/// Operations to bring a map widget from one marker set to the next.
/// Every removal is applied before any addition.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MarkerPlan {
    pub remove: Vec<MarkerId>,
    pub add: Vec<MarkerSpec>,
}

/// Desired markers for the current data. Buildings without coords or rooms
/// are skipped, as are repeated building codes.
pub fn build_markers(buildings: &[Building], user: Option<Position>) -> Vec<MarkerSpec> {
    let mut seen = HashSet::new();
    let mut markers = Vec::with_capacity(buildings.len() + 1);

    for building in buildings {
        let Some(coords) = building.coords else {
            continue;
        };
        if building.rooms.is_empty() {
            continue;
        }
        if !seen.insert(building.code.as_str()) {
            warn!("duplicate building code {}, keeping the first marker", building.code);
            continue;
        }
        markers.push(MarkerSpec {
            id: MarkerId::Building(building.code.clone()),
            lng_lat: coords.lng_lat(),
            class_name: marker_style(building.status).marker_class(),
        });
    }

    if let Some(user) = user {
        markers.push(MarkerSpec {
            id: MarkerId::User,
            lng_lat: [user.lng, user.lat],
            class_name: USER_MARKER_CLASS,
        });
    }

    markers
}

/// Full teardown and rebuild.
pub fn reconcile(previous: &[MarkerSpec], next: &[MarkerSpec]) -> MarkerPlan {
    MarkerPlan {
        remove: previous.iter().map(|marker| marker.id.clone()).collect(),
        add: next.to_vec(),
    }
}

/// The imperative map widget the plan is applied to.
pub trait MarkerLayer {
    fn remove_marker(&mut self, id: &MarkerId);
    fn add_marker(&mut self, marker: MarkerSpec);

    fn apply(&mut self, plan: &MarkerPlan) {
        for id in &plan.remove {
            self.remove_marker(id);
        }
        for marker in &plan.add {
            self.add_marker(marker.clone());
        }
    }
}

#[derive(Debug, Default)]
pub struct InMemoryMarkerLayer {
    markers: Vec<MarkerSpec>,
}

impl InMemoryMarkerLayer {
    pub fn markers(&self) -> &[MarkerSpec] {
        &self.markers
    }
}

impl MarkerLayer for InMemoryMarkerLayer {
    fn remove_marker(&mut self, id: &MarkerId) {
        self.markers.retain(|marker| &marker.id != id);
    }

    fn add_marker(&mut self, marker: MarkerSpec) {
        self.markers.push(marker);
    }
}

/// Remembers what is currently on the map so the next update can tear it down.
#[derive(Debug, Default)]
pub struct MarkerSet {
    current: Vec<MarkerSpec>,
}

impl MarkerSet {
    pub fn current(&self) -> &[MarkerSpec] {
        &self.current
    }

    pub fn update(&mut self, buildings: &[Building], user: Option<Position>) -> MarkerPlan {
        let next = build_markers(buildings, user);
        let plan = reconcile(&self.current, &next);
        self.current = next;
        plan
    }
}
