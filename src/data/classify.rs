//! Row classification and number display rules.

use serde::Serialize;

use crate::api::LogEntry;

/// Block counts above this are a high threat.
pub const HIGH_THREAT_THRESHOLD: u64 = 100;

/// Visual weight of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Badge {
    Danger,
    Warning,
    Success,
}

impl Badge {
    /// Stable CSS-style class name for this badge.
    pub fn class(&self) -> &'static str {
        match self {
            Badge::Danger => "badge-danger",
            Badge::Warning => "badge-warning",
            Badge::Success => "badge-success",
        }
    }
}

/// Threat level of a blocked source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum ThreatLevel {
    Medium,
    High,
}

impl ThreatLevel {
    pub fn classify(count: u64) -> Self {
        if count > HIGH_THREAT_THRESHOLD {
            ThreatLevel::High
        } else {
            ThreatLevel::Medium
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ThreatLevel::Medium => "Medium",
            ThreatLevel::High => "High",
        }
    }

    pub fn badge(&self) -> Badge {
        match self {
            ThreatLevel::Medium => Badge::Warning,
            ThreatLevel::High => Badge::Danger,
        }
    }
}

/// Status of a logged request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LogStatus {
    Blocked,
    Active,
}

impl LogStatus {
    pub fn of(entry: &LogEntry) -> Self {
        if entry.is_blocked {
            LogStatus::Blocked
        } else {
            LogStatus::Active
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LogStatus::Blocked => "blocked",
            LogStatus::Active => "active",
        }
    }

    pub fn badge(&self) -> Badge {
        match self {
            LogStatus::Blocked => Badge::Danger,
            LogStatus::Active => Badge::Success,
        }
    }
}

/// Status of a gateway row.
///
/// The backend reports no liveness, so every listed gateway is shown active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GatewayStatus {
    Active,
}

impl GatewayStatus {
    pub fn label(&self) -> &'static str {
        "Active"
    }

    pub fn badge(&self) -> Badge {
        Badge::Success
    }
}

/// Round a ratio or measurement to the nearest integer for display.
///
/// Halves round up. Non-finite input displays as 0.
pub fn round_percent(value: f64) -> i64 {
    if value.is_finite() {
        (value + 0.5).floor() as i64
    } else {
        0
    }
}

/// Format a count for display (e.g., 1234 -> "1.2K", 1234567 -> "1.2M").
pub fn format_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}
