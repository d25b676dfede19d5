//! Backend API abstraction.
//!
//! The refresh controller talks to the dashboard backend only through the
//! [`DashboardApi`] trait, so the polling lifecycle can be exercised against
//! an in-memory double as well as the real HTTP client.

mod error;
mod http;
mod types;

pub use error::FetchError;
pub use http::{HttpApi, HttpApiBuilder};
pub use types::{
    BlockedIp, DecodedLogs, GatewayStat, HourlyCount, LogEntry, LogsPage, StatsSnapshot, Summary,
    Timestamp,
};

#[cfg(test)]
pub(crate) use types::fixtures;

use std::fmt::Debug;

use async_trait::async_trait;

/// The two read endpoints of the dashboard backend.
///
/// # Example
///
/// ```no_run
/// use shieldwatch::{DashboardApi, HttpApi};
///
/// # tokio_test::block_on(async {
/// let api = HttpApi::builder().base_url("http://localhost:8001").build()?;
/// let stats = api.fetch_stats(24).await?;
/// println!("{} requests", stats.summary.total_requests);
/// # Ok::<_, shieldwatch::FetchError>(())
/// # });
/// ```
#[async_trait]
pub trait DashboardApi: Send + Sync + Debug {
    /// Fetch aggregate statistics for the trailing `hours`.
    async fn fetch_stats(&self, hours: u32) -> Result<StatsSnapshot, FetchError>;

    /// Fetch at most `limit` recent log entries from the trailing `hours`.
    async fn fetch_logs(&self, limit: u32, hours: u32) -> Result<Vec<LogEntry>, FetchError>;

    /// Returns a human-readable description of the backend.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;
}
