//! Server-Sent Events endpoint
//!
//! Streams every session and sync event to the presentation layer. On
//! connect the client receives an initial snapshot so it can render without
//! a separate status round-trip; afterwards each broadcast event is
//! forwarded as it happens, with heartbeat keep-alives in between.

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info};

use crate::AppState;

/// GET /api/events
pub async fn event_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!("New SSE client connected");

    let session = state.session.clone();
    let mut rx = session.subscribe();

    let stream = async_stream::stream! {
        // Initial snapshot so the client can render immediately
        let snapshot = session.snapshot().await;
        if let Ok(event) = Event::default().event("InitialState").json_data(&snapshot) {
            yield Ok(event);
        }

        loop {
            match rx.recv().await {
                Ok(app_event) => {
                    if let Ok(event) = Event::default().event("AppEvent").json_data(&app_event) {
                        yield Ok(event);
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    // Slow client; drop the backlog and keep streaming
                    debug!("SSE client lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("heartbeat"),
    )
}
