use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::query::QueryWindow;

use super::{
    entities::{CumulativeSnapshot, DayLogData, Envelope},
    FetchError, WorkLogSource,
};

/// The main realization of [WorkLogSource].
pub struct HttpWorkLogSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpWorkLogSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    #[instrument(skip(self))]
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = format!("{}{path}", self.base_url);
        debug!("Requesting {url}");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        match decode_envelope(&body) {
            // Error pages usually aren't envelopes, the status says more than the parser does.
            Err(FetchError::Decode(e)) if !status.is_success() => {
                warn!("Failed to decode error response {e}");
                Err(FetchError::Status(status))
            }
            result => result,
        }
    }
}

#[async_trait]
impl WorkLogSource for HttpWorkLogSource {
    async fn day_logs(&self, window: &QueryWindow) -> Result<DayLogData, FetchError> {
        self.get(&window.path()).await
    }

    async fn cumulative(&self, days: u32) -> Result<Vec<CumulativeSnapshot>, FetchError> {
        self.get(&format!("/api/cumulative/{days}")).await
    }
}

/// Unwraps `{code, data}`. Non zero codes become [FetchError::Api] carrying `data`.
pub fn decode_envelope<T: DeserializeOwned>(body: &[u8]) -> Result<T, FetchError> {
    let envelope: Envelope = serde_json::from_slice(body)?;
    let data = envelope.data.as_deref().map_or("null", |v| v.get());

    if envelope.code != 0 {
        let payload = serde_json::from_str(data).unwrap_or(serde_json::Value::Null);
        warn!("Data source reported code {} {payload}", envelope.code);
        return Err(FetchError::Api {
            code: envelope.code,
            payload,
        });
    }

    Ok(serde_json::from_str(data)?)
}
