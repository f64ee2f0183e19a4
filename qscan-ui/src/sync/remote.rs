//! Remote store client
//!
//! The remote store is one HTTP resource holding the entire shared roster
//! as a JSON array. GET reads it wholesale, POST overwrites it wholesale.
//! There is no merge, no optimistic concurrency check, and no versioning;
//! the last successful write from any client wins.

use qscan_common::records::{Record, RecordSet};
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!("qscan/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT_SECS: u64 = 15;

/// Remote store client errors
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Remote returned status {0}")]
    Status(u16),

    #[error("Remote payload decode error: {0}")]
    Decode(String),
}

/// Client for the shared remote roster resource
#[derive(Debug, Clone)]
pub struct RemoteStore {
    http_client: reqwest::Client,
    url: String,
}

impl RemoteStore {
    pub fn new(url: impl Into<String>) -> Result<Self, SyncError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| SyncError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the entire shared roster.
    ///
    /// An empty successfully-decoded array is a valid result, distinct from
    /// any failure; the caller decides whether to adopt it.
    pub async fn fetch_all(&self) -> Result<RecordSet, SyncError> {
        tracing::debug!(url = %self.url, "Fetching remote roster");

        let response = self
            .http_client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| SyncError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SyncError::Network(e.to_string()))?;

        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| SyncError::Decode(e.to_string()))?;

        if !value.is_array() {
            return Err(SyncError::Decode("payload is not a JSON array".to_string()));
        }

        serde_json::from_value::<RecordSet>(value).map_err(|e| SyncError::Decode(e.to_string()))
    }

    /// Overwrite the entire shared roster.
    pub async fn replace_all(&self, records: &[Record]) -> Result<(), SyncError> {
        tracing::debug!(url = %self.url, count = records.len(), "Pushing roster to remote");

        let response = self
            .http_client
            .post(&self.url)
            .json(records)
            .send()
            .await
            .map_err(|e| SyncError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Status(status.as_u16()));
        }

        Ok(())
    }
}
