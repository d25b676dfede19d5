//! Presentation logic for dashboard payloads.
//!
//! Pure functions that turn raw backend values into display values. Nothing
//! in this module performs I/O or holds state beyond its inputs.
//!
//! ## Submodules
//!
//! - [`time`]: Fixed UTC+5:30 timestamp formatting
//! - [`classify`]: Threat levels, status badges, and number rounding
//! - [`history`]: Cycle-to-cycle totals for rates and hourly sparklines
//! - [`view`]: The complete display model ([`DashboardView`])
//!
//! ## Data Flow
//!
//! ```text
//! StatsSnapshot + [LogEntry] (raw JSON)
//!        │
//!        ▼
//! DashboardView::build()
//!        │
//!        ├──▶ SummaryCards (rounded rates)
//!        ├──▶ ThreatRow (ThreatLevel), GatewayRow (always Active)
//!        └──▶ RequestRow (UTC+5:30 time, LogStatus); malformed rows skipped
//! ```

pub mod classify;
pub mod history;
pub mod time;
pub mod view;

pub use classify::{
    format_count, round_percent, Badge, GatewayStatus, LogStatus, ThreatLevel,
    HIGH_THREAT_THRESHOLD,
};
pub use history::History;
pub use time::{format_display_time, format_instant, parse_instant, FormatError};
pub use view::{DashboardView, GatewayRow, HourlyTrend, RequestRow, SummaryCards, ThreatRow};
