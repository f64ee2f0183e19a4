//! Roster endpoints
//!
//! Import is all-or-nothing: a body that fails to parse as a row sequence
//! is rejected whole by the JSON extractor before any state changes, so a
//! bad file never partially replaces the previous roster.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use qscan_common::records::Record;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::AppState;

/// Import acknowledgement
#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub count: usize,
}

/// GET /api/records
pub async fn get_records(State(state): State<AppState>) -> Json<Vec<Record>> {
    Json(state.session.records().await)
}

/// POST /api/records
///
/// Body: the row-object sequence produced by the workbook-reading
/// collaborator (one JSON object per row, column header -> raw cell value).
pub async fn import_records(
    State(state): State<AppState>,
    Json(rows): Json<Vec<Map<String, Value>>>,
) -> Result<Json<ImportResponse>, RosterError> {
    let count = state.session.load_rows(&rows).await?;
    Ok(Json(ImportResponse { count }))
}

/// DELETE /api/records
pub async fn clear_records(State(state): State<AppState>) -> Result<StatusCode, RosterError> {
    state.session.clear().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Roster mutation error for HTTP responses
#[derive(Debug)]
pub struct RosterError(qscan_common::Error);

impl From<qscan_common::Error> for RosterError {
    fn from(e: qscan_common::Error) -> Self {
        RosterError(e)
    }
}

impl IntoResponse for RosterError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": format!("Roster update failed: {}", self.0),
        }));

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
