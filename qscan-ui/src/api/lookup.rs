//! Lookup endpoints
//!
//! Two submission surfaces feed the same lookup: `/api/search` for typed
//! queries (rejected here when they trim to empty, so the lookup itself
//! never sees an empty typed query) and `/api/scan` for decoded QR tokens
//! (passed through verbatim; an empty token simply fails to match).

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use qscan_common::lookup::LookupError;
use qscan_common::records::Record;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::AppState;

/// Typed query from the manual search box
#[derive(Debug, Deserialize)]
pub struct SearchBody {
    pub query: String,
}

/// Decoded token from the scanning collaborator
#[derive(Debug, Deserialize)]
pub struct ScanBody {
    pub token: String,
}

/// Successful lookup response
#[derive(Debug, Serialize)]
pub struct LookupResponse {
    pub record: Record,
}

/// POST /api/search
pub async fn search(
    State(state): State<AppState>,
    Json(body): Json<SearchBody>,
) -> Result<Json<LookupResponse>, LookupReject> {
    if body.query.trim().is_empty() {
        return Err(LookupReject::EmptyQuery);
    }

    run_lookup(&state, &body.query).await
}

/// POST /api/scan
pub async fn scan(
    State(state): State<AppState>,
    Json(body): Json<ScanBody>,
) -> Result<Json<LookupResponse>, LookupReject> {
    run_lookup(&state, &body.token).await
}

async fn run_lookup(state: &AppState, token: &str) -> Result<Json<LookupResponse>, LookupReject> {
    match state.session.submit_query(token).await {
        Ok(record) => Ok(Json(LookupResponse { record })),
        Err(e) => Err(LookupReject::Lookup(e)),
    }
}

/// Lookup rejection types for HTTP responses
#[derive(Debug)]
pub enum LookupReject {
    /// Typed query trimmed to empty (rejected at the submission boundary)
    EmptyQuery,
    /// The lookup itself declined (empty roster or no match)
    Lookup(LookupError),
}

impl IntoResponse for LookupReject {
    fn into_response(self) -> Response {
        let (status, reason, message) = match self {
            LookupReject::EmptyQuery => (
                StatusCode::BAD_REQUEST,
                "empty_query",
                "Query must not be empty".to_string(),
            ),
            LookupReject::Lookup(LookupError::EmptyDataset) => (
                StatusCode::CONFLICT,
                "empty_dataset",
                LookupError::EmptyDataset.to_string(),
            ),
            LookupReject::Lookup(e @ LookupError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, "not_found", e.to_string())
            }
        };

        let body = Json(json!({
            "reason": reason,
            "error": message,
        }));

        (status, body).into_response()
    }
}
