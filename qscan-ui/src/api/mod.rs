//! HTTP API handlers for qscan-ui

pub mod gate;
pub mod health;
pub mod lookup;
pub mod records;
pub mod sse;
pub mod status;

pub use gate::gate_middleware;
pub use health::health_routes;
pub use lookup::{scan, search};
pub use records::{clear_records, get_records, import_records};
pub use sse::event_stream;
pub use status::{get_status, toggle_scanner};
