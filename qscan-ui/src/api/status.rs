//! Session status endpoints

use axum::{extract::State, Json};
use qscan_common::events::Mode;
use serde::Serialize;

use crate::session::SessionSnapshot;
use crate::AppState;

/// GET /api/status
pub async fn get_status(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.session.snapshot().await)
}

/// Scanner toggle acknowledgement
#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub mode: Mode,
}

/// POST /api/scanner/toggle
pub async fn toggle_scanner(State(state): State<AppState>) -> Json<ToggleResponse> {
    let mode = state.session.toggle_scan().await;
    Json(ToggleResponse { mode })
}
