use chrono::NaiveTime;
use serde::Serialize;

use super::markers::{MarkerPlan, MarkerSet, MarkerSpec};
use super::presenter::{BuildingView, EmptyStateCopy, LegendEntry, legend, present};
use super::resolver::{ResolverPolicy, resolve_all};
use super::selection::Selection;
use super::snapshot::Snapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewState {
    Buildings,
    Empty,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct ViewModel {
    pub state: ViewState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub buildings: Vec<BuildingView>,
    pub markers: Vec<MarkerSpec>,
    pub marker_plan: MarkerPlan,
    pub legend: Vec<LegendEntry>,
    pub active_building: Option<String>,
}

/// UI state that outlives a single render.
#[derive(Debug, Default)]
pub struct ViewSession {
    pub selection: Selection,
    pub markers: MarkerSet,
}

pub struct Renderer {
    pub policy: ResolverPolicy,
    pub copy: EmptyStateCopy,
}

impl Renderer {
    pub fn render(&self, snapshot: Option<&Snapshot>, session: &mut ViewSession, now: NaiveTime) -> ViewModel {
        let position = snapshot.and_then(|s| s.position);

        let mut buildings = match snapshot.map(|s| &s.result) {
            Some(Err(err)) => {
                let marker_plan = session.markers.update(&[], position);
                return ViewModel {
                    state: ViewState::Error,
                    message: Some(err.message()),
                    status: Some(err.status().as_u16()),
                    buildings: Vec::new(),
                    markers: session.markers.current().to_vec(),
                    marker_plan,
                    legend: legend(),
                    active_building: session.selection.active().map(str::to_string),
                };
            }
            Some(Ok(buildings)) => buildings.clone(),
            None => Vec::new(),
        };

        resolve_all(&mut buildings, now, &self.policy);
        if buildings.iter().all(|building| building.rooms.is_empty()) {
            buildings.clear();
        }
        session.selection.retain(&buildings);

        let marker_plan = session.markers.update(&buildings, position);
        let markers = session.markers.current().to_vec();
        let active_building = session.selection.active().map(str::to_string);

        if buildings.is_empty() {
            return ViewModel {
                state: ViewState::Empty,
                message: Some(self.copy.message_at(now)),
                status: None,
                buildings: Vec::new(),
                markers,
                marker_plan,
                legend: legend(),
                active_building,
            };
        }

        let views = buildings
            .iter()
            .map(|building| {
                let mut view = present(building);
                view.expanded = session.selection.is_expanded(&building.code);
                if building.rooms.is_empty() {
                    view.empty_message = Some(self.copy.message_at(now));
                }
                view
            })
            .collect();

        ViewModel {
            state: ViewState::Buildings,
            message: None,
            status: None,
            buildings: views,
            markers,
            marker_plan,
            legend: legend(),
            active_building,
        }
    }
}
