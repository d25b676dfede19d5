//! HTTP client for the dashboard backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{DashboardApi, FetchError, LogEntry, LogsPage, StatsSnapshot};

/// Default per-request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Dashboard backend client over HTTP.
///
/// Every request is bounded by the client timeout; an expired request
/// surfaces as [`FetchError::Timeout`].
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
    description: String,
}

impl HttpApi {
    /// Create a new builder for configuring the client.
    pub fn builder() -> HttpApiBuilder {
        HttpApiBuilder::default()
    }

    /// The base URL requests are sent to, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, u32)],
    ) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, ?query, "requesting");

        let response = self.client.get(&url).query(query).send().await?;

        let status = response.status();
        debug!(%url, status = status.as_u16(), "response received");
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl DashboardApi for HttpApi {
    async fn fetch_stats(&self, hours: u32) -> Result<StatsSnapshot, FetchError> {
        self.get_json("/api/stats", &[("hours", hours)]).await
    }

    async fn fetch_logs(&self, limit: u32, hours: u32) -> Result<Vec<LogEntry>, FetchError> {
        let page: LogsPage = self
            .get_json("/api/logs", &[("limit", limit), ("hours", hours)])
            .await?;
        let decoded = page.into_entries();
        if decoded.skipped > 0 {
            warn!(skipped = decoded.skipped, "dropped malformed log rows");
        }
        Ok(decoded.entries)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Builder for [`HttpApi`].
#[derive(Debug, Default)]
pub struct HttpApiBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl HttpApiBuilder {
    /// Set the backend base URL (e.g., "http://localhost:8001").
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<HttpApi, FetchError> {
        let base_url = self
            .base_url
            .unwrap_or_else(|| "http://localhost:8001".to_string());
        let base_url = base_url.trim_end_matches('/').to_string();

        let parsed =
            Url::parse(&base_url).map_err(|e| FetchError::InvalidEndpoint(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::InvalidEndpoint(format!(
                "unsupported scheme '{}'",
                parsed.scheme()
            )));
        }

        let client = Client::builder()
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()
            .map_err(|e| FetchError::Http(e.to_string()))?;

        Ok(HttpApi {
            client,
            description: format!("http: {}", base_url),
            base_url,
        })
    }
}
