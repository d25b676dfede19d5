//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, help overlay,
//! and the full-page loading and error screens.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::{App, View};
use crate::data::format_count;
use crate::refresh::Phase;

/// Render the header bar with the headline numbers.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let phase = app.state.phase;
    let mut spans = vec![
        Span::styled(" ● ", app.theme.phase_style(phase)),
        Span::styled("SHIELDWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(phase.label(), app.theme.phase_style(phase)),
    ];

    if let Some(view) = &app.view {
        let summary = &view.summary;
        spans.extend([
            Span::raw(" │ "),
            Span::styled(
                format_count(summary.total_requests),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(" req "),
            Span::styled(
                format_count(summary.blocked_requests),
                Style::default().fg(app.theme.danger),
            ),
            Span::raw(format!(" blocked ({}%) │ ", summary.block_rate_percent)),
            Span::raw(format!("{} IPs", format_count(summary.unique_ips))),
        ]);
        if let Some(hours) = summary.window_hours {
            spans.push(Span::raw(format!(" │ last {}h", hours)));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the tab bar showing available views.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = View::ALL
        .iter()
        .enumerate()
        .map(|(i, view)| Line::from(format!(" {}:{} ", i + 1, view.label())))
        .collect();

    let selected = View::ALL
        .iter()
        .position(|v| *v == app.current_view)
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows: current view, time since last update, request rate, available controls.
/// Also displays temporary status messages.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let status = match app.state.phase {
        Phase::Loading => format!(" Loading from {}... | q:quit", app.source_description()),
        Phase::Errored => " Error | r:retry e:export ?:help q:quit".to_string(),
        Phase::Ready => {
            let controls = if app.filter_active {
                "Type to search | Enter:apply Esc:cancel"
            } else {
                match app.current_view {
                    View::Overview => "Tab:switch r:refresh e:export ?:help q:quit",
                    View::Threats => "/:search Tab:switch r:refresh ?:help q:quit",
                    View::Requests => "/:search Enter:detail Tab:switch r:refresh ?:help q:quit",
                }
            };

            let updated = app
                .seconds_since_update()
                .map(|s| format!("Updated {}s ago", s))
                .unwrap_or_default();
            let rate = match (
                app.history.request_rate_per_min(),
                app.history.blocked_rate_per_min(),
            ) {
                (Some(total), Some(blocked)) => {
                    format!(" | {:.0} req/min, {:.0} blocked/min", total, blocked)
                }
                _ => String::new(),
            };

            format!(
                " {} | {}{} | {}",
                app.current_view.label(),
                updated,
                rate,
                controls
            )
        }
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Full-page placeholder shown until the first cycle completes.
pub fn render_loading(frame: &mut Frame, app: &App, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            "Loading dashboard...",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            app.source_description().to_string(),
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];
    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, centered_rect(area.width, 3, area));
}

/// Full-page error shown while the last cycle failed.
pub fn render_error(frame: &mut Frame, app: &App, area: Rect) {
    let message = app
        .state
        .error_message
        .as_deref()
        .unwrap_or("Unknown error");

    let mut lines = vec![
        Line::from(Span::styled(
            format!("Error: {}", message),
            Style::default().fg(app.theme.danger).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(app.source_description().to_string()),
    ];
    if app.view.is_some() {
        lines.push(Line::from(Span::styled(
            "Data from the last successful refresh is kept (e:export)",
            Style::default().add_modifier(Modifier::DIM),
        )));
    }
    lines.push(Line::from(Span::styled(
        "Press r to retry",
        Style::default().add_modifier(Modifier::DIM),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.danger));
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);

    let width = 70u16.min(area.width);
    frame.render_widget(paragraph, centered_rect(width, 8, area));
}

/// A bordered placeholder for a section with no rows.
pub fn render_empty(frame: &mut Frame, app: &App, area: Rect, title: &str, text: &str) {
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));
    let empty = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", text),
            Style::default().add_modifier(Modifier::DIM),
        )),
    ])
    .block(block);
    frame.render_widget(empty, area);
}

/// Title suffix describing the active filter, e.g. ` /10.0/ [c:clear]`.
pub fn filter_info(app: &App) -> String {
    if app.filter_active {
        format!(" /{}_", app.filter_text)
    } else if !app.filter_text.is_empty() {
        format!(" /{}/ [c:clear]", app.filter_text)
    } else {
        String::new()
    }
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let section = |title: &'static str| {
        Line::from(vec![Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )])
    };

    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        section(" Navigation"),
        Line::from("  1/2/3       Jump to view"),
        Line::from("  ←/→ Tab     Switch views"),
        Line::from("  ↑/↓ j/k     Navigate list"),
        Line::from("  PgUp/PgDn   Jump 10 items"),
        Line::from("  Home/End    Jump to first/last"),
        Line::from("  Enter       Request detail"),
        Line::from("  Esc         Go back"),
        Line::from(""),
        section(" Threats & Requests"),
        Line::from("  /         Filter by IP or path"),
        Line::from("  c         Clear filter"),
        Line::from(""),
        section(" General"),
        Line::from("  r         Refresh now"),
        Line::from("  e         Export to JSON"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 24u16.min(area.height.saturating_sub(2));
    let help_area = centered_rect(help_width, help_height, area);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}

/// A `width` x `height` rectangle centered in `area`, clipped to fit.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 40);
        assert_eq!(centered_rect(40, 10, area), Rect::new(30, 15, 40, 10));
        assert_eq!(centered_rect(200, 80, area), area);
    }
}
