use std::sync::MutexGuard;

use axum::Json;
use axum::body::Bytes;
use axum::routing::put;
use axum::{Router, extract::State, http::StatusCode, routing::get};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::gateway::AVAILABILITY_PATH;
use crate::gateway::dto::LocationRequest;
use crate::models::{Building, Position};
use crate::services::ViewModel;
use crate::services::selection::{ScrollRequest, SelectionSource};
use crate::services::view::ViewSession;
use crate::state::AppState;

const NO_DATA: &str = "No data provided";
const INVALID_LOCATION: &str = "Invalid location data. 'lat' and 'lng' are required.";

#[derive(Deserialize)]
struct SelectionRequest {
    building_code: String,
    source: SelectionSource,
}

#[derive(Serialize)]
struct SelectionResponse {
    active_building: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scroll: Option<ScrollRequest>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(AVAILABILITY_PATH, get(proxy_get).post(proxy_post))
        .route("/api/view", get(view_get).post(view_post))
        .route("/api/view/selection", put(select_building))
        .with_state(state)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn proxy_get(State(state): State<AppState>) -> Result<Json<Vec<Building>>, AppError> {
    let buildings = fetch(&state, None).await?;
    Ok(Json(buildings))
}

async fn proxy_post(State(state): State<AppState>, body: Bytes) -> Result<Json<Vec<Building>>, AppError> {
    let position = parse_location(&body)?;
    let buildings = fetch(&state, Some(position)).await?;
    Ok(Json(buildings))
}

async fn view_get(State(state): State<AppState>) -> Json<ViewModel> {
    Json(refresh_and_render(&state, None).await)
}

async fn view_post(State(state): State<AppState>, body: Bytes) -> Result<Json<ViewModel>, AppError> {
    let position = parse_location(&body)?;
    Ok(Json(refresh_and_render(&state, Some(position)).await))
}

async fn select_building(
    State(state): State<AppState>,
    Json(req): Json<SelectionRequest>,
) -> Json<SelectionResponse> {
    let mut session = lock_session(&state);
    let scroll = session.selection.select(&req.building_code, req.source);
    Json(SelectionResponse {
        active_building: session.selection.active().map(str::to_string),
        scroll,
    })
}

/// Fetches through the gateway and records the outcome; a response that
/// loses the race to a newer one is still returned to its own caller.
async fn fetch(state: &AppState, position: Option<Position>) -> Result<Vec<Building>, AppError> {
    let ticket = state.store.begin();
    let result = state.gateway.fetch_availability(position).await;
    state.store.commit(ticket, position, result.clone());
    Ok(result?)
}

async fn refresh_and_render(state: &AppState, position: Option<Position>) -> ViewModel {
    // The outcome lands in the store either way; rendering reads the newest snapshot.
    let _ = fetch(state, position).await;
    let snapshot = state.store.latest();
    let now = state.clock.now();
    let mut session = lock_session(state);
    state.renderer.render(snapshot.as_ref(), &mut session, now)
}

fn lock_session(state: &AppState) -> MutexGuard<'_, ViewSession> {
    match state.session.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn parse_location(body: &[u8]) -> Result<Position, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::BadRequest(NO_DATA.to_string()));
    }
    let req: LocationRequest = serde_json::from_slice(body)
        .map_err(|_| AppError::BadRequest(NO_DATA.to_string()))?;
    req.position()
        .ok_or_else(|| AppError::BadRequest(INVALID_LOCATION.to_string()))
}
