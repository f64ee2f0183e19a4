//! # QSCAN Common Library
//!
//! Shared code for the QSCAN roster lookup service:
//! - Canonical record model and row normalizer
//! - Token-to-record lookup
//! - Event types (AppEvent enum, session Mode)
//! - Configuration resolution
//! - Error types

pub mod config;
pub mod error;
pub mod events;
pub mod lookup;
pub mod records;

pub use error::{Error, Result};
pub use events::{AppEvent, Mode};
pub use lookup::{resolve, LookupError};
pub use records::{normalize_row, normalize_rows, Record, RecordSet, STORAGE_KEY};
