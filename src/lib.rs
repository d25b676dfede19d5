//! # shieldwatch
//!
//! A terminal dashboard and library for watching an API-gateway security
//! backend: traffic totals, blocked requests, top offending source IPs, and
//! the recent request log.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Application                          │
//! │  ┌─────────┐   ┌───────────┐   watch   ┌─────────┐  ┌──────┐ │
//! │  │   api   │◀──│  refresh  │──────────▶│   app   │─▶│  ui  │ │
//! │  │ (HTTP)  │   │(ViewState)│ ViewState │ (state) │  │      │ │
//! │  └─────────┘   └───────────┘           └────┬────┘  └──────┘ │
//! │                                             │                │
//! │                                             ▼                │
//! │                                        ┌─────────┐           │
//! │                                        │  data   │           │
//! │                                        │(display)│           │
//! │                                        └─────────┘           │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`api`]**: The [`DashboardApi`] trait and its reqwest-backed [`HttpApi`]
//! - **[`refresh`]**: [`RefreshController`], the periodic fetch loop that owns
//!   the [`ViewState`] and publishes it through a watch channel
//! - **[`data`]**: Pure display rules - UTC+5:30 timestamps, threat levels,
//!   status badges, rounding, and the [`DashboardView`] model
//! - **[`app`]**: UI state, navigation, filtering, and export
//! - **[`ui`]**: Terminal rendering using ratatui
//! - **[`config`]**: Layered settings (defaults, TOML file, environment, CLI)
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Watch a local backend
//! shieldwatch --url http://localhost:8001
//!
//! # Fetch once and write the dashboard as JSON
//! shieldwatch --export dashboard.json
//! ```
//!
//! ### As a library
//!
//! ```no_run
//! use shieldwatch::{HttpApi, Phase, RefreshController, RefreshSettings};
//!
//! # tokio_test::block_on(async {
//! let api = HttpApi::builder()
//!     .base_url("http://localhost:8001")
//!     .build()
//!     .unwrap();
//! let controller = RefreshController::new(api, RefreshSettings::default());
//!
//! controller.run_cycle().await;
//! let state = controller.snapshot();
//! if state.phase == Phase::Ready {
//!     let view = state.view().unwrap();
//!     println!("{} requests, {}% blocked", view.summary.total_requests, view.summary.block_rate_percent);
//! }
//! # });
//! ```

pub mod api;
pub mod app;
pub mod config;
pub mod data;
pub mod events;
pub mod logging;
pub mod refresh;
pub mod ui;

// Re-export main types for convenience
pub use api::{DashboardApi, FetchError, HttpApi, LogEntry, StatsSnapshot};
pub use app::App;
pub use config::Settings;
pub use data::{DashboardView, ThreatLevel};
pub use refresh::{Phase, RefreshController, RefreshHandle, RefreshSettings, ViewState};
