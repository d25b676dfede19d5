//! Payload types for the dashboard backend API.
//!
//! These types match the JSON produced by the gateway dashboard backend's
//! `/api/stats` and `/api/logs` endpoints. Optional fields cover keys the
//! backend emits that the core view does not depend on.

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// Aggregate statistics for the trailing window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub summary: Summary,

    /// Per-gateway request counts, in backend order.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub gateway_stats: Vec<GatewayStat>,

    /// Most-blocked sources, pre-sorted descending by the backend.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub top_blocked_ips: Vec<BlockedIp>,

    /// Hourly totals, oldest first.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub hourly_breakdown: Vec<HourlyCount>,
}

/// Headline numbers for the trailing window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_requests: u64,
    pub blocked_requests: u64,
    pub unique_ips: u64,
    pub avg_response_time_ms: f64,
    /// Percentage of blocked requests, in `[0, 100]`.
    pub block_rate: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_requests: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_range_hours: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayStat {
    pub gateway_id: String,
    pub request_count: u64,
}

/// A source address and how many of its requests were blocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedIp {
    pub source_ip: String,
    /// The backend groups under `block_count`; older builds used `count`.
    #[serde(alias = "block_count")]
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyCount {
    /// Hour label, e.g. `"14:00"`.
    pub hour: String,
    pub total: u64,
    #[serde(default)]
    pub blocked: u64,
}

/// A raw log timestamp as sent by the backend.
///
/// Numbers are epoch milliseconds; strings are ISO-8601 date-times. Parsing
/// into an instant is deferred to the presentation layer, so a single bad
/// row cannot fail the whole response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Millis(i64),
    Text(String),
}

impl From<i64> for Timestamp {
    fn from(ms: i64) -> Self {
        Timestamp::Millis(ms)
    }
}

impl From<&str> for Timestamp {
    fn from(s: &str) -> Self {
        Timestamp::Text(s.to_string())
    }
}

/// One request seen by a gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: Timestamp,
    pub source_ip: String,
    pub request_path: String,
    pub response_status_code: u16,
    pub response_time_ms: f64,
    /// Stored as `0`/`1` by the backend database.
    #[serde(deserialize_with = "bool_or_int")]
    pub is_blocked: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_id: Option<String>,
}

/// Body of `GET /api/logs`.
///
/// Rows are kept as raw JSON so one malformed row cannot fail the page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogsPage {
    #[serde(default)]
    pub logs: Option<Vec<serde_json::Value>>,
}

/// Entries decoded from a [`LogsPage`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedLogs {
    pub entries: Vec<LogEntry>,
    /// Rows dropped because they did not match [`LogEntry`].
    pub skipped: usize,
}

impl LogsPage {
    /// Decode each row on its own, treating a missing or null list as empty.
    pub fn into_entries(self) -> DecodedLogs {
        let mut decoded = DecodedLogs::default();
        for row in self.logs.unwrap_or_default() {
            match serde_json::from_value::<LogEntry>(row) {
                Ok(entry) => decoded.entries.push(entry),
                Err(e) => {
                    warn!(error = %e, "skipping malformed log row");
                    decoded.skipped += 1;
                }
            }
        }
        decoded
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn bool_or_int<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(n) => n != 0,
    })
}


#[cfg(test)]
mod tests {
    use super::*;

    fn backend_stats_json() -> &'static str {
        r#"{
            "summary": {
                "total_requests": 120,
                "blocked_requests": 80,
                "allowed_requests": 40,
                "block_rate": 66.66666666666667,
                "unique_ips": 7,
                "avg_response_time_ms": 3.21,
                "time_range_hours": 24
            },
            "top_blocked_ips": [{"source_ip": "192.168.1.50", "block_count": 75}],
            "gateway_stats": [{"gateway_id": "gateway-1", "request_count": 120}],
            "hourly_breakdown": [{"hour": "13:00", "total": 10, "blocked": 2}]
        }"#
    }

    #[test]
    fn test_parse_backend_stats() {
        let stats: StatsSnapshot = serde_json::from_str(backend_stats_json()).unwrap();
        assert_eq!(stats.summary.total_requests, 120);
        assert_eq!(stats.summary.allowed_requests, Some(40));
        assert_eq!(stats.top_blocked_ips[0].count, 75);
        assert_eq!(stats.gateway_stats[0].gateway_id, "gateway-1");
        assert_eq!(stats.hourly_breakdown.len(), 1);
    }

    #[test]
    fn test_parse_minimal_stats() {
        let json = r#"{"summary": {"total_requests": 0, "blocked_requests": 0,
            "unique_ips": 0, "avg_response_time_ms": 0, "block_rate": 0},
            "top_blocked_ips": null}"#;
        let stats: StatsSnapshot = serde_json::from_str(json).unwrap();
        assert!(stats.gateway_stats.is_empty());
        assert!(stats.top_blocked_ips.is_empty());
        assert!(stats.hourly_breakdown.is_empty());
    }

    #[test]
    fn test_blocked_ip_accepts_count_key() {
        let ip: BlockedIp = serde_json::from_str(r#"{"source_ip": "1.2.3.4", "count": 9}"#).unwrap();
        assert_eq!(ip.count, 9);
    }

    #[test]
    fn test_log_entry_integer_flag_and_timestamp() {
        let json = r#"{"id": 3, "timestamp": 1705343400000, "source_ip": "1.1.1.1",
            "request_path": "/", "request_method": "POST", "response_status_code": 403,
            "response_time_ms": 1.5, "is_blocked": 1, "prediction": "attack",
            "confidence_score": 0.97, "gateway_id": "gateway-1"}"#;
        let entry: LogEntry = serde_json::from_str(json).unwrap();
        assert!(entry.is_blocked);
        assert_eq!(entry.timestamp, Timestamp::Millis(1_705_343_400_000));
        assert_eq!(entry.request_method.as_deref(), Some("POST"));
    }

    #[test]
    fn test_log_entry_string_timestamp() {
        let json = r#"{"timestamp": "2024-01-15T18:30:00.123456", "source_ip": "1.1.1.1",
            "request_path": "/", "response_status_code": 200,
            "response_time_ms": 1.5, "is_blocked": false}"#;
        let entry: LogEntry = serde_json::from_str(json).unwrap();
        assert!(!entry.is_blocked);
        assert_eq!(entry.timestamp, Timestamp::from("2024-01-15T18:30:00.123456"));
    }

    #[test]
    fn test_logs_page_missing_or_null() {
        let page: LogsPage = serde_json::from_str("{}").unwrap();
        assert_eq!(page.into_entries(), DecodedLogs::default());

        let page: LogsPage = serde_json::from_str(r#"{"logs": null, "count": 0}"#).unwrap();
        assert_eq!(page.into_entries(), DecodedLogs::default());
    }

    #[test]
    fn test_logs_page_drops_malformed_rows() {
        let json = r#"{"logs": [
            {"timestamp": "2024-01-15T18:30:00Z", "source_ip": "1.1.1.1",
             "request_path": "/", "response_status_code": 200,
             "response_time_ms": 1.5, "is_blocked": false},
            {"timestamp": 1705343400000.5, "source_ip": "2.2.2.2",
             "request_path": "/", "response_status_code": 200,
             "response_time_ms": 1.5, "is_blocked": false},
            {"timestamp": "2024-01-15T18:30:00Z", "source_ip": "3.3.3.3",
             "request_path": "/", "response_status_code": 200,
             "response_time_ms": null, "is_blocked": true}
        ]}"#;
        let decoded = serde_json::from_str::<LogsPage>(json).unwrap().into_entries();
        assert_eq!(decoded.entries.len(), 1);
        assert_eq!(decoded.entries[0].source_ip, "1.1.1.1");
        assert_eq!(decoded.skipped, 2);
    }

    #[test]
    fn test_logs_page_rejects_non_list() {
        assert!(serde_json::from_str::<LogsPage>(r#"{"logs": "oops"}"#).is_err());
    }
}
