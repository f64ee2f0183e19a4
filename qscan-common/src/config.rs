//! Configuration loading and data directory resolution

use crate::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Default remote sync resource: one shared payload for the whole
/// application (not per-user, not per-record).
pub const DEFAULT_SYNC_URL: &str = "https://kvdb.io/S2zH9f7m6k3j1p4q8t5r/employee_data";

/// Default HTTP bind address for the service
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5730";

/// Values overridable from the command line (highest priority tier)
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub data_dir: Option<String>,
    pub bind_addr: Option<String>,
    pub sync_url: Option<String>,
    pub admin_token: Option<String>,
}

/// Optional keys of the TOML config file
#[derive(Debug, Clone, Default, Deserialize)]
struct FileConfig {
    data_dir: Option<String>,
    bind_addr: Option<String>,
    sync_url: Option<String>,
    admin_token: Option<String>,
}

/// Resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Directory holding the local SQLite cache
    pub data_dir: PathBuf,
    /// HTTP bind address
    pub bind_addr: String,
    /// Remote sync resource URL
    pub sync_url: String,
    /// Shared token gating mutating endpoints; `None` disables the gate
    pub admin_token: Option<String>,
}

impl ServiceConfig {
    /// Resolve configuration following the priority order:
    /// 1. Command-line argument (highest priority)
    /// 2. Environment variable
    /// 3. TOML config file
    /// 4. Compiled default (fallback)
    pub fn resolve(overrides: ConfigOverrides) -> Self {
        let file = load_config_file().unwrap_or_default();

        let data_dir = overrides
            .data_dir
            .or_else(|| std::env::var("QSCAN_DATA").ok())
            .or(file.data_dir)
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        let bind_addr = overrides
            .bind_addr
            .or_else(|| std::env::var("QSCAN_BIND").ok())
            .or(file.bind_addr)
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let sync_url = overrides
            .sync_url
            .or_else(|| std::env::var("QSCAN_SYNC_URL").ok())
            .or(file.sync_url)
            .unwrap_or_else(|| DEFAULT_SYNC_URL.to_string());

        let admin_token = overrides
            .admin_token
            .or_else(|| std::env::var("QSCAN_ADMIN_TOKEN").ok())
            .or(file.admin_token)
            .filter(|t| !t.is_empty());

        ServiceConfig {
            data_dir,
            bind_addr,
            sync_url,
            admin_token,
        }
    }

    /// Path of the local cache database inside the data directory
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("qscan.db")
    }

    /// Create the data directory if it does not exist yet
    pub fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir)?;
        }
        if !self.data_dir.is_dir() {
            return Err(Error::Config(format!(
                "Data path is not a directory: {}",
                self.data_dir.display()
            )));
        }
        Ok(())
    }
}

/// Locate and parse the config file, if any.
///
/// Linux checks `~/.config/qscan/config.toml` then `/etc/qscan/config.toml`;
/// other platforms use the user config directory only. A file that exists
/// but fails to parse is logged and ignored.
fn load_config_file() -> Option<FileConfig> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("qscan").join("config.toml"));
    }
    if cfg!(target_os = "linux") {
        candidates.push(PathBuf::from("/etc/qscan/config.toml"));
    }

    for path in candidates {
        if !path.exists() {
            continue;
        }
        match std::fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str::<FileConfig>(&contents) {
                Ok(config) => return Some(config),
                Err(e) => {
                    tracing::warn!("Ignoring unparsable config file {}: {}", path.display(), e);
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config file {}: {}", path.display(), e);
            }
        }
    }
    None
}

/// OS-dependent default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("qscan"))
        .unwrap_or_else(|| PathBuf::from("./qscan_data"))
}
