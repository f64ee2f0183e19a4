//! qscan-ui library - roster sync and lookup service
//!
//! The HTTP backend the presentation layer talks to: it owns the session
//! controller (observable roster, current result, interaction mode), the
//! local SQLite cache, and the remote store client, and exposes them as a
//! small JSON API plus an SSE event stream.

use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;
pub mod session;
pub mod sync;

use session::SessionController;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Session controller (roster, mode, current result, sync signal)
    pub session: Arc<SessionController>,
    /// Shared token for the admin gate; `None` disables the gate
    pub admin_token: Option<String>,
}

impl AppState {
    pub fn new(session: Arc<SessionController>, admin_token: Option<String>) -> Self {
        Self {
            session,
            admin_token,
        }
    }
}

/// Build application router
///
/// Mutating roster routes pass the admin gate; everything else is open.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post};

    // Gated routes (roster mutations require external gate approval)
    let gated = Router::new()
        .route(
            "/api/records",
            post(api::import_records).delete(api::clear_records),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::gate_middleware,
        ));

    // Open routes
    let open = Router::new()
        .route("/api/status", get(api::get_status))
        .route("/api/records", get(api::get_records))
        .route("/api/search", post(api::search))
        .route("/api/scan", post(api::scan))
        .route("/api/scanner/toggle", post(api::toggle_scanner))
        .route("/api/events", get(api::event_stream))
        .merge(api::health_routes());

    // Combine routers
    Router::new()
        .merge(gated)
        .merge(open)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
