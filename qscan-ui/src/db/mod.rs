//! Local cache database access

pub mod cache;
pub mod init;

pub use cache::{clear_roster, load_roster, save_roster};
pub use init::open_or_create;
