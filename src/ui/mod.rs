//! Terminal UI rendering using ratatui.
//!
//! Each view is implemented in its own submodule with a `render` function;
//! [`draw`] lays them out for one frame.
//!
//! ## Submodules
//!
//! - [`summary`]: Overview with summary cards, hourly trend, and gateway table
//! - [`threats`]: Top blocked source IPs with threat levels
//! - [`requests`]: Recent request log with blocked/active status
//! - [`detail`]: Modal overlay showing every field of one request
//! - [`common`]: Shared components (header, tabs, status bar, help, loading and error pages)
//! - [`theme`]: Light/dark theme support with terminal auto-detection
//!
//! ## Rendering Architecture
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Header (common::render_header)       │
//! ├──────────────────────────────────────┤
//! │ Tabs (common::render_tabs)           │
//! ├──────────────────────────────────────┤
//! │                                      │
//! │ View Content                         │
//! │ (summary/threats/requests::render)   │
//! │ or the loading/error page            │
//! │                                      │
//! ├──────────────────────────────────────┤
//! │ Status Bar (common::render_status)   │
//! └──────────────────────────────────────┘
//!         ↑
//!    Overlays rendered on top:
//!    - detail::render_overlay
//!    - common::render_help
//! ```

pub mod common;
pub mod detail;
pub mod requests;
pub mod summary;
pub mod theme;
pub mod threats;

pub use theme::Theme;

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, View};
use crate::refresh::Phase;

/// Minimum terminal size for usable display.
pub const MIN_WIDTH: u16 = 60;
pub const MIN_HEIGHT: u16 = 12;

/// Row where table content starts: header, tabs, then the table header.
pub const CONTENT_START_ROW: u16 = 3;

/// Draw one frame.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = format!(
            "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
            area.width, area.height, MIN_WIDTH, MIN_HEIGHT
        );
        let paragraph = Paragraph::new(msg)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Yellow));
        let centered = Rect::new(0, (area.height / 2).saturating_sub(2), area.width, 5.min(area.height));
        frame.render_widget(paragraph, centered);
        return;
    }

    let chunks = Layout::vertical([
        Constraint::Length(1), // Header bar
        Constraint::Length(1), // Tabs
        Constraint::Min(8),    // Content
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    common::render_header(frame, app, chunks[0]);
    common::render_tabs(frame, app, chunks[1]);

    match app.state.phase {
        Phase::Loading => common::render_loading(frame, app, chunks[2]),
        Phase::Errored => common::render_error(frame, app, chunks[2]),
        Phase::Ready => match app.current_view {
            View::Overview => summary::render(frame, app, chunks[2]),
            View::Threats => threats::render(frame, app, chunks[2]),
            View::Requests => requests::render(frame, app, chunks[2]),
        },
    }

    common::render_status_bar(frame, app, chunks[3]);

    if app.show_detail_overlay && app.state.phase == Phase::Ready {
        detail::render_overlay(frame, app, area);
    }

    if app.show_help {
        common::render_help(frame, app, area);
    }
}
