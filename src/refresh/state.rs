//! View state owned by the refresh controller.

use chrono::{DateTime, Utc};

use crate::api::{LogEntry, StatsSnapshot};
use crate::data::DashboardView;

/// Where the view is in its refresh lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No cycle has completed yet.
    #[default]
    Loading,
    /// Statistics are present.
    Ready,
    /// The last applied cycle failed fatally.
    Errored,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Loading => "Loading",
            Phase::Ready => "Ready",
            Phase::Errored => "Error",
        }
    }
}

/// Result of one fetch cycle, ready to be applied.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleResult {
    /// Statistics arrived. `logs` is `None` when the logs request was skipped.
    Success {
        stats: StatsSnapshot,
        logs: Option<Vec<LogEntry>>,
    },
    /// The cycle failed fatally.
    Failed { message: String },
}

impl CycleResult {
    pub fn failed(message: impl Into<String>) -> Self {
        CycleResult::Failed {
            message: message.into(),
        }
    }
}

/// Everything the render layer reads.
///
/// While `phase` is [`Phase::Errored`], `stats` and `logs` still hold the
/// last successful fetch, if any.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub stats: Option<StatsSnapshot>,
    pub logs: Vec<LogEntry>,
    pub phase: Phase,
    pub error_message: Option<String>,
    /// Id of the cycle last applied; 0 before the first.
    pub cycle: u64,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ViewState {
    /// A fresh state in the loading phase.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    /// Build the display model, if statistics are available.
    pub fn view(&self) -> Option<DashboardView> {
        self.stats
            .as_ref()
            .map(|stats| DashboardView::build(stats, &self.logs))
    }

    /// Apply a cycle's result.
    pub(crate) fn apply(&mut self, cycle: u64, result: CycleResult, at: DateTime<Utc>) {
        match result {
            CycleResult::Success { stats, logs } => {
                self.stats = Some(stats);
                if let Some(logs) = logs {
                    self.logs = logs;
                }
                self.phase = Phase::Ready;
                self.error_message = None;
            }
            CycleResult::Failed { message } => {
                self.phase = Phase::Errored;
                self.error_message = Some(message);
            }
        }
        self.cycle = cycle;
        self.updated_at = Some(at);
    }
}
