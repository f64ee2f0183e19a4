//! Admin gate middleware
//!
//! Mutating endpoints (import, clear) must be approved by the credential
//! gate before they are reachable. The gate itself is an external
//! collaborator; this middleware is its seam: requests carry the shared
//! token it issued in the `X-Admin-Token` header. An unset token disables
//! the gate entirely (useful for tests and single-device deployments).

use axum::{
    body::Body,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::warn;

use crate::AppState;

pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Gate middleware for mutating routes.
///
/// Returns 401 Unauthorized when a token is configured and the request
/// does not carry it.
pub async fn gate_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, GateError> {
    let Some(expected) = state.admin_token.as_deref() else {
        // No token configured: gate disabled, pass through
        return Ok(next.run(request).await);
    };

    let provided = request
        .headers()
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());

    match provided {
        Some(token) if token == expected => Ok(next.run(request).await),
        Some(_) => {
            warn!("Admin gate rejected request: wrong token");
            Err(GateError::WrongToken)
        }
        None => Err(GateError::MissingToken),
    }
}

/// Gate error types for HTTP responses
#[derive(Debug)]
pub enum GateError {
    MissingToken,
    WrongToken,
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        let message = match self {
            GateError::MissingToken => "Admin token required",
            GateError::WrongToken => "Invalid admin token",
        };

        let body = Json(json!({
            "error": message,
        }));

        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}
