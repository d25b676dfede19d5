//! Periodic data acquisition.
//!
//! The [`RefreshController`] owns the only mutable state in the system, a
//! [`ViewState`]. Each cycle fetches statistics, then recent logs, and
//! applies the combined result in one step. Observers receive every applied
//! state through a watch channel.
//!
//! ## Cycle ordering
//!
//! Cycles are scheduled at a fixed period and may overlap when the backend
//! is slow. Each cycle takes a monotonically increasing id when it is
//! scheduled; a result older than the last applied one is discarded, so the
//! newest-started cycle always wins.
//!
//! ## Teardown
//!
//! [`RefreshHandle::stop`] (or dropping the handle) ends scheduling. Cycles
//! already in flight may finish their requests, but their results are not
//! applied.

mod state;

pub use state::{CycleResult, Phase, ViewState};

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::api::{DashboardApi, FetchError};

/// Error message shown when the statistics endpoint answers with an error status.
pub const STATS_FAILED: &str = "Failed to fetch statistics";

/// Fetch parameters, fixed for the lifetime of a controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshSettings {
    /// Trailing window requested from the backend, in hours.
    pub window_hours: u32,
    /// Maximum number of log entries requested.
    pub log_limit: u32,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            window_hours: 24,
            log_limit: 50,
        }
    }
}

/// What happened to a cycle's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The result was written; the state is now in this phase.
    Applied(Phase),
    /// A newer cycle had already been applied, or the handle was stopped.
    Discarded,
}

/// Per-`start` token checked before applying results.
#[derive(Debug, Default)]
struct Session {
    stopped: AtomicBool,
}

impl Session {
    fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
struct Inner {
    api: Arc<dyn DashboardApi>,
    settings: RefreshSettings,
    state: watch::Sender<ViewState>,
    next_cycle: AtomicU64,
    /// Serialises applying results against stopping a session.
    apply_lock: Mutex<()>,
}

/// Drives periodic fetches and owns the view state.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use shieldwatch::{HttpApi, RefreshController, RefreshSettings};
///
/// # tokio_test::block_on(async {
/// let api = HttpApi::builder().base_url("http://localhost:8001").build().unwrap();
/// let controller = RefreshController::new(api, RefreshSettings::default());
/// let mut updates = controller.subscribe();
///
/// let handle = controller.start(Duration::from_secs(30));
/// updates.changed().await.unwrap();
/// println!("phase: {:?}", updates.borrow().phase);
/// handle.stop();
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct RefreshController {
    inner: Arc<Inner>,
}

impl RefreshController {
    /// Create a controller for the given backend.
    pub fn new<A: DashboardApi + 'static>(api: A, settings: RefreshSettings) -> Self {
        Self::from_shared(Arc::new(api), settings)
    }

    /// Create a controller for a backend that is already shared.
    pub fn from_shared(api: Arc<dyn DashboardApi>, settings: RefreshSettings) -> Self {
        let (state, _) = watch::channel(ViewState::new());
        Self {
            inner: Arc::new(Inner {
                api,
                settings,
                state,
                next_cycle: AtomicU64::new(0),
                apply_lock: Mutex::new(()),
            }),
        }
    }

    /// Subscribe to applied view states.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.inner.state.subscribe()
    }

    /// A copy of the current view state.
    pub fn snapshot(&self) -> ViewState {
        self.inner.state.borrow().clone()
    }

    /// Returns a description of the backend being polled.
    pub fn source_description(&self) -> &str {
        self.inner.api.description()
    }

    pub fn settings(&self) -> &RefreshSettings {
        &self.inner.settings
    }

    /// Run and apply one cycle now, outside of any schedule.
    pub async fn run_cycle(&self) -> CycleOutcome {
        let id = self.next_cycle_id();
        self.cycle(id, None).await
    }

    /// Run one cycle immediately, then one every `interval`.
    ///
    /// Must be called from within a tokio runtime. The period is measured
    /// between schedulings, not from the end of the previous cycle.
    pub fn start(&self, interval: Duration) -> RefreshHandle {
        let interval = interval.max(Duration::from_millis(1));
        let session = Arc::new(Session::default());
        let trigger = Arc::new(Notify::new());

        info!(
            interval_ms = interval.as_millis() as u64,
            source = self.source_description(),
            "starting refresh loop"
        );

        let task = tokio::spawn(schedule(
            self.clone(),
            interval,
            session.clone(),
            trigger.clone(),
        ));

        RefreshHandle {
            controller: self.clone(),
            session,
            trigger,
            task,
        }
    }

    fn next_cycle_id(&self) -> u64 {
        self.inner.next_cycle.fetch_add(1, Ordering::SeqCst) + 1
    }

    async fn cycle(&self, id: u64, session: Option<&Session>) -> CycleOutcome {
        debug!(cycle = id, "refresh cycle started");

        let result = self.fetch().await;
        if let CycleResult::Failed { message } = &result {
            error!(cycle = id, %message, "refresh cycle failed");
        }

        let outcome = self.apply(id, result, session);
        debug!(cycle = id, ?outcome, "refresh cycle finished");
        outcome
    }

    async fn fetch(&self) -> CycleResult {
        let settings = &self.inner.settings;
        let api = &self.inner.api;

        let stats = match api.fetch_stats(settings.window_hours).await {
            Ok(stats) => stats,
            Err(FetchError::Status(status)) => {
                warn!(status, "statistics request rejected");
                return CycleResult::failed(STATS_FAILED);
            }
            Err(e) => return CycleResult::failed(e.to_string()),
        };

        let logs = match api.fetch_logs(settings.log_limit, settings.window_hours).await {
            Ok(mut logs) => {
                logs.truncate(settings.log_limit as usize);
                Some(logs)
            }
            Err(e) if e.is_skippable() => {
                warn!(error = %e, "logs unavailable, keeping previous entries");
                None
            }
            Err(e) => return CycleResult::failed(e.to_string()),
        };

        CycleResult::Success { stats, logs }
    }

    fn apply(&self, id: u64, result: CycleResult, session: Option<&Session>) -> CycleOutcome {
        let _guard = self.inner.apply_lock.lock();

        if session.is_some_and(Session::is_stopped) {
            debug!(cycle = id, "dropping result of stopped refresh loop");
            return CycleOutcome::Discarded;
        }

        let mut outcome = CycleOutcome::Discarded;
        self.inner.state.send_if_modified(|state| {
            if id <= state.cycle {
                debug!(cycle = id, applied = state.cycle, "dropping stale cycle result");
                return false;
            }
            state.apply(id, result, Utc::now());
            outcome = CycleOutcome::Applied(state.phase);
            true
        });
        outcome
    }
}

async fn schedule(
    controller: RefreshController,
    interval: Duration,
    session: Arc<Session>,
    trigger: Arc<Notify>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = trigger.notified() => debug!("manual refresh requested"),
        }

        if session.is_stopped() {
            break;
        }

        let id = controller.next_cycle_id();
        let controller = controller.clone();
        let session = session.clone();
        tokio::spawn(async move {
            controller.cycle(id, Some(&session)).await;
        });
    }
}

/// Cancellation handle returned by [`RefreshController::start`].
///
/// Dropping the handle stops the loop.
#[derive(Debug)]
pub struct RefreshHandle {
    controller: RefreshController,
    session: Arc<Session>,
    trigger: Arc<Notify>,
    task: JoinHandle<()>,
}

impl RefreshHandle {
    /// Stop scheduling cycles.
    ///
    /// After this returns no result from this loop is applied, including
    /// cycles whose requests are still in flight.
    pub fn stop(&self) {
        let was_stopped = {
            let _guard = self.controller.inner.apply_lock.lock();
            self.session.stopped.swap(true, Ordering::SeqCst)
        };
        self.task.abort();
        if !was_stopped {
            info!("refresh loop stopped");
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.session.is_stopped()
    }

    /// Schedule an extra cycle as soon as possible.
    pub fn refresh_now(&self) {
        if !self.is_stopped() {
            self.trigger.notify_one();
        }
    }

    /// A cloneable trigger for [`RefreshHandle::refresh_now`].
    pub fn trigger(&self) -> RefreshTrigger {
        RefreshTrigger {
            session: self.session.clone(),
            notify: self.trigger.clone(),
        }
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Requests an immediate cycle from a running refresh loop.
#[derive(Debug, Clone)]
pub struct RefreshTrigger {
    session: Arc<Session>,
    notify: Arc<Notify>,
}

impl RefreshTrigger {
    /// Returns false if the loop has been stopped.
    pub fn fire(&self) -> bool {
        if self.session.is_stopped() {
            return false;
        }
        self.notify.notify_one();
        true
    }
}
