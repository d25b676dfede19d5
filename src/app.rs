//! Application state and navigation logic.

use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;

use crate::data::{DashboardView, History, RequestRow, ThreatRow};
use crate::refresh::{Phase, RefreshTrigger, ViewState};
use crate::ui::Theme;

/// The current view/tab in the TUI.
///
/// Request detail is shown as an overlay (controlled by
/// `App::show_detail_overlay`) rather than as a separate view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Summary cards, hourly trend, and gateway table.
    Overview,
    /// Top blocked source IPs.
    Threats,
    /// Recent request log.
    Requests,
}

impl View {
    pub fn next(self) -> Self {
        match self {
            View::Overview => View::Threats,
            View::Threats => View::Requests,
            View::Requests => View::Overview,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            View::Overview => View::Requests,
            View::Threats => View::Overview,
            View::Requests => View::Threats,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Overview => "Overview",
            View::Threats => "Threats",
            View::Requests => "Requests",
        }
    }

    pub const ALL: [View; 3] = [View::Overview, View::Threats, View::Requests];
}

/// JSON document written by the export action.
#[derive(Debug, Serialize)]
struct ExportDocument<'a> {
    source: &'a str,
    phase: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
    #[serde(flatten)]
    view: DashboardView,
}

/// Write the dashboard currently held in `state` to `path` as pretty JSON.
///
/// Fails if no statistics have been fetched yet.
pub fn export_view(state: &ViewState, source: &str, path: &Path) -> Result<()> {
    let Some(view) = state.view() else {
        bail!("No data to export");
    };

    let document = ExportDocument {
        source,
        phase: state.phase.label(),
        updated_at: state.updated_at,
        error: state.error_message.as_deref(),
        view,
    };

    let json = serde_json::to_string_pretty(&document)?;
    let mut file = std::fs::File::create(path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

/// Main application state.
///
/// The app never fetches on its own. It mirrors the refresh controller's
/// [`ViewState`] through a watch receiver and keeps UI-only state
/// (selection, filter, overlays) alongside.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,
    pub show_detail_overlay: bool,

    // Data
    updates: watch::Receiver<ViewState>,
    trigger: Option<RefreshTrigger>,
    source_description: String,
    pub state: ViewState,
    /// Display model for `state`, rebuilt whenever a new state arrives.
    pub view: Option<DashboardView>,
    pub history: History,

    // Navigation state
    pub selected_threat_index: usize,
    pub selected_request_index: usize,

    // Search/filter
    pub filter_text: String,
    pub filter_active: bool,

    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create an app observing the given state channel.
    pub fn new(
        updates: watch::Receiver<ViewState>,
        source_description: impl Into<String>,
        theme: Theme,
    ) -> Self {
        let mut app = Self {
            running: true,
            current_view: View::Overview,
            show_help: false,
            show_detail_overlay: false,
            updates,
            trigger: None,
            source_description: source_description.into(),
            state: ViewState::new(),
            view: None,
            history: History::new(),
            selected_threat_index: 0,
            selected_request_index: 0,
            filter_text: String::new(),
            filter_active: false,
            theme,
            status_message: None,
        };
        app.load_state();
        app
    }

    /// Attach the trigger used by the manual refresh key.
    pub fn with_trigger(mut self, trigger: RefreshTrigger) -> Self {
        self.trigger = Some(trigger);
        self
    }

    /// Returns a description of the backend being watched.
    pub fn source_description(&self) -> &str {
        &self.source_description
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Pick up the latest applied state, if it changed.
    ///
    /// Returns true if a new state was loaded.
    pub fn sync(&mut self) -> bool {
        match self.updates.has_changed() {
            Ok(true) => {
                self.load_state();
                true
            }
            // Unchanged, or the controller is gone: keep what we have.
            _ => false,
        }
    }

    fn load_state(&mut self) {
        self.state = self.updates.borrow_and_update().clone();
        self.view = self.state.view();

        if self.state.phase == Phase::Ready {
            if let (Some(stats), Some(at)) = (&self.state.stats, self.state.updated_at) {
                self.history.record(
                    self.state.cycle,
                    at,
                    stats.summary.total_requests,
                    stats.summary.blocked_requests,
                );
            }
        }

        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let threats = self.filtered_threats().len();
        let requests = self.filtered_requests().len();
        self.selected_threat_index = self.selected_threat_index.min(threats.saturating_sub(1));
        self.selected_request_index = self.selected_request_index.min(requests.saturating_sub(1));
        if requests == 0 {
            self.show_detail_overlay = false;
        }
    }

    /// Ask the refresh loop for an immediate cycle.
    pub fn refresh_now(&mut self) {
        let fired = self.trigger.as_ref().is_some_and(|t| t.fire());
        if fired {
            self.set_status_message("Refreshing...".to_string());
        } else {
            self.set_status_message("Refresh loop is not running".to_string());
        }
    }

    pub fn next_view(&mut self) {
        self.set_view(self.current_view.next());
    }

    pub fn prev_view(&mut self) {
        self.set_view(self.current_view.prev());
    }

    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
        self.show_detail_overlay = false;
    }

    /// Number of selectable rows in the current view.
    fn row_count(&self) -> usize {
        match self.current_view {
            View::Overview => 0,
            View::Threats => self.filtered_threats().len(),
            View::Requests => self.filtered_requests().len(),
        }
    }

    fn selection_mut(&mut self) -> Option<&mut usize> {
        match self.current_view {
            View::Overview => None,
            View::Threats => Some(&mut self.selected_threat_index),
            View::Requests => Some(&mut self.selected_request_index),
        }
    }

    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    /// Move selection down by n items.
    pub fn select_next_n(&mut self, n: usize) {
        let max = self.row_count().saturating_sub(1);
        if let Some(index) = self.selection_mut() {
            *index = (*index + n).min(max);
        }
    }

    /// Move selection up by n items.
    pub fn select_prev_n(&mut self, n: usize) {
        if let Some(index) = self.selection_mut() {
            *index = index.saturating_sub(n);
        }
    }

    pub fn select_first(&mut self) {
        if let Some(index) = self.selection_mut() {
            *index = 0;
        }
    }

    pub fn select_last(&mut self) {
        let last = self.row_count().saturating_sub(1);
        if let Some(index) = self.selection_mut() {
            *index = last;
        }
    }

    /// Select a row by its visual position, ignoring out-of-range rows.
    pub fn select_row(&mut self, row: usize) {
        if row < self.row_count() {
            if let Some(index) = self.selection_mut() {
                *index = row;
            }
        }
    }

    /// Threat rows matching the filter, in backend order.
    pub fn filtered_threats(&self) -> Vec<&ThreatRow> {
        let Some(view) = &self.view else {
            return Vec::new();
        };
        view.threats
            .iter()
            .filter(|t| self.matches_filter(&t.source_ip))
            .collect()
    }

    /// Request rows matching the filter on source IP, path, or method.
    pub fn filtered_requests(&self) -> Vec<&RequestRow> {
        let Some(view) = &self.view else {
            return Vec::new();
        };
        view.requests
            .iter()
            .filter(|r| {
                self.matches_filter(&r.source_ip)
                    || self.matches_filter(&r.path)
                    || r.method.as_deref().is_some_and(|m| self.matches_filter(m))
            })
            .collect()
    }

    /// The request row under the cursor in the Requests view.
    pub fn selected_request(&self) -> Option<&RequestRow> {
        self.filtered_requests().get(self.selected_request_index).copied()
    }

    /// Open the detail overlay for the selected request.
    pub fn enter_detail(&mut self) {
        if self.current_view == View::Requests && self.selected_request().is_some() {
            self.show_detail_overlay = true;
        }
    }

    /// Navigate back: close overlay first, then go to Overview.
    pub fn go_back(&mut self) {
        if self.show_detail_overlay {
            self.show_detail_overlay = false;
            return;
        }
        self.current_view = View::Overview;
    }

    pub fn close_overlay(&mut self) {
        self.show_detail_overlay = false;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Enter filter input mode (starts capturing keystrokes for search).
    pub fn start_filter(&mut self) {
        self.filter_active = true;
    }

    /// Exit filter input mode without clearing the filter text.
    pub fn cancel_filter(&mut self) {
        self.filter_active = false;
    }

    /// Clear the filter text and exit filter mode.
    pub fn clear_filter(&mut self) {
        self.filter_text.clear();
        self.filter_active = false;
        self.clamp_selection();
    }

    pub fn filter_push(&mut self, c: char) {
        self.filter_text.push(c);
        self.clamp_selection();
    }

    pub fn filter_pop(&mut self) {
        self.filter_text.pop();
        self.clamp_selection();
    }

    /// Case-insensitive substring match against the current filter.
    pub fn matches_filter(&self, text: &str) -> bool {
        if self.filter_text.is_empty() {
            return true;
        }
        text.to_lowercase().contains(&self.filter_text.to_lowercase())
    }

    /// Seconds since the last applied cycle.
    pub fn seconds_since_update(&self) -> Option<i64> {
        self.state
            .updated_at
            .map(|at| (Utc::now() - at).num_seconds().max(0))
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export the current dashboard to a file.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        export_view(&self.state, &self.source_description, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fixtures;
    use crate::refresh::CycleResult;

    fn ready_state(cycle: u64) -> ViewState {
        let mut state = ViewState::new();
        let logs = vec![
            fixtures::log("10.0.0.9", true),
            fixtures::log("192.168.1.20", false),
            fixtures::log("10.0.0.7", true),
        ];
        state.apply(
            cycle,
            CycleResult::Success {
                stats: fixtures::stats(500, 25.0),
                logs: Some(logs),
            },
            Utc::now(),
        );
        state
    }

    fn test_app() -> (watch::Sender<ViewState>, App) {
        let (tx, rx) = watch::channel(ViewState::new());
        let app = App::new(rx, "http: test", Theme::dark());
        (tx, app)
    }

    #[test]
    fn test_view_cycling() {
        assert_eq!(View::Overview.next(), View::Threats);
        assert_eq!(View::Requests.next(), View::Overview);
        assert_eq!(View::Overview.prev(), View::Requests);
        for view in View::ALL {
            assert_eq!(view.next().prev(), view);
        }
    }

    #[test]
    fn test_starts_loading() {
        let (_tx, app) = test_app();
        assert!(app.state.is_loading());
        assert!(app.view.is_none());
        assert!(app.filtered_requests().is_empty());
    }

    #[test]
    fn test_sync_picks_up_new_state() {
        let (tx, mut app) = test_app();
        assert!(!app.sync());

        tx.send(ready_state(1)).unwrap();
        assert!(app.sync());
        assert_eq!(app.state.phase, Phase::Ready);
        assert_eq!(app.view.as_ref().unwrap().requests.len(), 3);
        assert_eq!(app.history.len(), 1);

        assert!(!app.sync());
    }

    #[test]
    fn test_sync_after_controller_dropped() {
        let (tx, mut app) = test_app();
        tx.send(ready_state(1)).unwrap();
        app.sync();
        drop(tx);

        assert!(!app.sync());
        assert_eq!(app.state.cycle, 1);
        assert!(app.view.is_some());
    }

    #[test]
    fn test_filter_matches_ip_and_path() {
        let (tx, mut app) = test_app();
        tx.send(ready_state(1)).unwrap();
        app.sync();

        app.filter_push('1');
        app.filter_push('0');
        app.filter_push('.');
        assert_eq!(app.filtered_requests().len(), 2);
        assert_eq!(app.filtered_threats().len(), 2);

        app.clear_filter();
        for c in "LOGIN".chars() {
            app.filter_push(c);
        }
        assert_eq!(app.filtered_requests().len(), 3);
        assert!(app.filtered_threats().is_empty());
    }

    #[test]
    fn test_selection_bounds() {
        let (tx, mut app) = test_app();
        tx.send(ready_state(1)).unwrap();
        app.sync();

        app.set_view(View::Requests);
        app.select_next_n(10);
        assert_eq!(app.selected_request_index, 2);
        app.select_prev();
        assert_eq!(app.selected_request_index, 1);
        app.select_first();
        assert_eq!(app.selected_request_index, 0);
        app.select_last();
        assert_eq!(app.selected_request(), app.filtered_requests().last().copied());

        // Overview has nothing to select.
        app.set_view(View::Overview);
        app.select_next();
        assert_eq!(app.selected_threat_index, 0);
    }

    #[test]
    fn test_selection_clamped_when_rows_shrink() {
        let (tx, mut app) = test_app();
        tx.send(ready_state(1)).unwrap();
        app.sync();
        app.set_view(View::Requests);
        app.select_last();

        let mut smaller = ready_state(2);
        smaller.logs.truncate(1);
        tx.send(smaller).unwrap();
        app.sync();
        assert_eq!(app.selected_request_index, 0);
    }

    #[test]
    fn test_detail_overlay_only_on_requests() {
        let (tx, mut app) = test_app();
        tx.send(ready_state(1)).unwrap();
        app.sync();

        app.enter_detail();
        assert!(!app.show_detail_overlay);

        app.set_view(View::Requests);
        app.enter_detail();
        assert!(app.show_detail_overlay);

        app.go_back();
        assert!(!app.show_detail_overlay);
        assert_eq!(app.current_view, View::Requests);
        app.go_back();
        assert_eq!(app.current_view, View::Overview);
    }

    #[test]
    fn test_refresh_without_loop() {
        let (_tx, mut app) = test_app();
        app.refresh_now();
        assert_eq!(app.get_status_message(), Some("Refresh loop is not running"));
    }

    #[test]
    fn test_export_requires_data() {
        let (_tx, app) = test_app();
        let dir = tempfile::tempdir().unwrap();
        let err = app.export_state(&dir.path().join("out.json")).unwrap_err();
        assert!(err.to_string().contains("No data"));
    }

    #[test]
    fn test_export_writes_view() {
        let (tx, mut app) = test_app();
        tx.send(ready_state(1)).unwrap();
        app.sync();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        app.export_state(&path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["source"], "http: test");
        assert_eq!(json["phase"], "Ready");
        assert_eq!(json["summary"]["total_requests"], 500);
        assert_eq!(json["requests"].as_array().unwrap().len(), 3);
        assert!(json.get("error").is_none());
    }
}
