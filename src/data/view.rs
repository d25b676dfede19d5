//! Display model built from raw API payloads.

use serde::Serialize;
use tracing::warn;

use super::classify::{round_percent, GatewayStatus, LogStatus, ThreatLevel};
use super::history::hourly_levels;
use super::time::format_display_time;
use crate::api::{LogEntry, StatsSnapshot};

/// Headline cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryCards {
    pub total_requests: u64,
    pub blocked_requests: u64,
    /// Rounded for display; the snapshot keeps the precise value.
    pub block_rate_percent: i64,
    pub unique_ips: u64,
    pub avg_response_ms: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_hours: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GatewayRow {
    pub gateway_id: String,
    pub request_count: u64,
    pub status: GatewayStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThreatRow {
    pub source_ip: String,
    pub count: u64,
    pub level: ThreatLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestRow {
    /// Request time at UTC+5:30.
    pub time: String,
    pub source_ip: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    pub path: String,
    pub status_code: u16,
    pub response_ms: i64,
    pub status: LogStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

/// Hour-by-hour totals with sparkline levels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyTrend {
    pub labels: Vec<String>,
    pub totals: Vec<u64>,
    pub blocked: Vec<u64>,
    pub levels: Vec<u8>,
}

/// Everything a render pass shows, in display form.
///
/// Table rows keep backend order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub summary: SummaryCards,
    pub gateways: Vec<GatewayRow>,
    pub threats: Vec<ThreatRow>,
    pub requests: Vec<RequestRow>,
    pub hourly: HourlyTrend,
    /// Log entries dropped because a field could not be displayed.
    pub skipped_requests: usize,
}

impl DashboardView {
    /// Build the display model from a stats snapshot and its log list.
    ///
    /// A log entry whose timestamp cannot be formatted is skipped rather
    /// than failing the whole view.
    pub fn build(stats: &StatsSnapshot, logs: &[LogEntry]) -> Self {
        let summary = &stats.summary;

        let gateways = stats
            .gateway_stats
            .iter()
            .map(|g| GatewayRow {
                gateway_id: g.gateway_id.clone(),
                request_count: g.request_count,
                status: GatewayStatus::Active,
            })
            .collect();

        let threats = stats
            .top_blocked_ips
            .iter()
            .map(|ip| ThreatRow {
                source_ip: ip.source_ip.clone(),
                count: ip.count,
                level: ThreatLevel::classify(ip.count),
            })
            .collect();

        let mut skipped_requests = 0;
        let requests = logs
            .iter()
            .filter_map(|entry| match request_row(entry) {
                Some(row) => Some(row),
                None => {
                    skipped_requests += 1;
                    None
                }
            })
            .collect();

        let hours = &stats.hourly_breakdown;
        let hourly = HourlyTrend {
            labels: hours.iter().map(|h| h.hour.clone()).collect(),
            totals: hours.iter().map(|h| h.total).collect(),
            blocked: hours.iter().map(|h| h.blocked).collect(),
            levels: hourly_levels(hours),
        };

        Self {
            summary: SummaryCards {
                total_requests: summary.total_requests,
                blocked_requests: summary.blocked_requests,
                block_rate_percent: round_percent(summary.block_rate),
                unique_ips: summary.unique_ips,
                avg_response_ms: round_percent(summary.avg_response_time_ms),
                window_hours: summary.time_range_hours,
            },
            gateways,
            threats,
            requests,
            hourly,
            skipped_requests,
        }
    }
}

fn request_row(entry: &LogEntry) -> Option<RequestRow> {
    let time = match format_display_time(&entry.timestamp) {
        Ok(time) => time,
        Err(e) => {
            warn!(source_ip = %entry.source_ip, error = %e, "skipping log entry");
            return None;
        }
    };

    Some(RequestRow {
        time,
        source_ip: entry.source_ip.clone(),
        method: entry.request_method.clone(),
        path: entry.request_path.clone(),
        status_code: entry.response_status_code,
        response_ms: round_percent(entry.response_time_ms),
        status: LogStatus::of(entry),
        prediction: entry.prediction.clone(),
        confidence: entry.confidence_score,
        gateway_id: entry.gateway_id.clone(),
        user_agent: entry.user_agent.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{fixtures, HourlyCount, Timestamp};

    #[test]
    fn test_summary_cards_round_for_display() {
        let stats = fixtures::stats(1000, 66.6);
        let view = DashboardView::build(&stats, &[]);
        assert_eq!(view.summary.block_rate_percent, 67);
        assert_eq!(view.summary.avg_response_ms, 12);
        assert_eq!(view.summary.window_hours, Some(24));
        assert_eq!(stats.summary.block_rate, 66.6);
    }

    #[test]
    fn test_threat_rows_keep_backend_order() {
        let stats = fixtures::stats(10, 0.0);
        let view = DashboardView::build(&stats, &[]);
        assert_eq!(view.threats.len(), 2);
        assert_eq!(view.threats[0].source_ip, "10.0.0.9");
        assert_eq!(view.threats[0].level, ThreatLevel::High);
        assert_eq!(view.threats[1].level, ThreatLevel::Medium);
    }

    #[test]
    fn test_gateways_always_active() {
        let stats = fixtures::stats(10, 0.0);
        let view = DashboardView::build(&stats, &[]);
        assert_eq!(view.gateways[0].status, GatewayStatus::Active);
        assert_eq!(view.gateways[0].request_count, 10);
    }

    #[test]
    fn test_request_rows() {
        let stats = fixtures::stats(10, 0.0);
        let logs = vec![fixtures::log("1.1.1.1", true), fixtures::log("2.2.2.2", false)];
        let view = DashboardView::build(&stats, &logs);

        assert_eq!(view.requests.len(), 2);
        assert_eq!(view.requests[0].time, "16/01/2024, 12:00:00 AM");
        assert_eq!(view.requests[0].status, LogStatus::Blocked);
        assert_eq!(view.requests[0].response_ms, 5);
        assert_eq!(view.requests[1].status, LogStatus::Active);
        assert_eq!(view.skipped_requests, 0);
    }

    #[test]
    fn test_malformed_timestamp_skips_row() {
        let stats = fixtures::stats(10, 0.0);
        let mut bad = fixtures::log("6.6.6.6", false);
        bad.timestamp = Timestamp::from("not-a-time");
        let logs = vec![fixtures::log("1.1.1.1", true), bad];

        let view = DashboardView::build(&stats, &logs);
        assert_eq!(view.requests.len(), 1);
        assert_eq!(view.requests[0].source_ip, "1.1.1.1");
        assert_eq!(view.skipped_requests, 1);
    }

    #[test]
    fn test_hourly_trend() {
        let mut stats = fixtures::stats(10, 0.0);
        stats.hourly_breakdown = vec![
            HourlyCount { hour: "09:00".to_string(), total: 0, blocked: 0 },
            HourlyCount { hour: "10:00".to_string(), total: 70, blocked: 5 },
        ];
        let view = DashboardView::build(&stats, &[]);
        assert_eq!(view.hourly.labels, vec!["09:00", "10:00"]);
        assert_eq!(view.hourly.levels, vec![0, 7]);
        assert_eq!(view.hourly.blocked, vec![0, 5]);
    }

    #[test]
    fn test_export_shape() {
        let stats = fixtures::stats(10, 40.0);
        let view = DashboardView::build(&stats, &[fixtures::log("1.1.1.1", true)]);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["summary"]["block_rate_percent"], 40);
        assert_eq!(json["threats"][0]["level"], "High");
        assert_eq!(json["requests"][0]["status"], "Blocked");
        assert_eq!(json["gateways"][0]["status"], "Active");
    }
}
