//! The data source holding the work logs. It lives behind an HTTP API, every response wrapped into
//! an [entities::Envelope].

pub mod client;
pub mod entities;

use async_trait::async_trait;
use entities::{CumulativeSnapshot, DayLogData};
use thiserror::Error;

use crate::query::QueryWindow;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to reach the data source: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Data source responded with status {0}")]
    Status(reqwest::StatusCode),

    /// The request went through, but the data source reported a failure.
    #[error("Data source responded with code {code}: {payload}")]
    Api {
        code: i64,
        payload: serde_json::Value,
    },

    #[error("Unexpected response from the data source: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Intended to serve as a contract for anything able to provide work logs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkLogSource: Send + Sync + 'static {
    /// Per day entries and totals for a window.
    async fn day_logs(&self, window: &QueryWindow) -> Result<DayLogData, FetchError>;

    /// Running totals over the last `days` days.
    async fn cumulative(&self, days: u32) -> Result<Vec<CumulativeSnapshot>, FetchError>;
}
