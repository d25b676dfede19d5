//! Requests view rendering.
//!
//! Lists recent gateway requests, newest first as the backend returns them.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::data::LogStatus;

use super::common::{filter_info, render_empty};

/// Render the Requests view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref view) = app.view else {
        return;
    };

    if view.requests.is_empty() {
        let text = if view.skipped_requests > 0 {
            format!("{} entries could not be displayed", view.skipped_requests)
        } else {
            "No requests logged yet".to_string()
        };
        render_empty(frame, app, area, "Recent Requests", &text);
        return;
    }

    let requests = app.filtered_requests();

    let header = Row::new(vec![
        Cell::from("Timestamp"),
        Cell::from("Source IP"),
        Cell::from("Path"),
        Cell::from("Code"),
        Cell::from("Time"),
        Cell::from("Status"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = requests
        .iter()
        .map(|r| {
            let path = match &r.method {
                Some(method) => format!("{} {}", method, r.path),
                None => r.path.clone(),
            };
            let row_style = if r.status == LogStatus::Blocked {
                Style::default().fg(app.theme.danger)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(r.time.clone()),
                Cell::from(r.source_ip.clone()),
                Cell::from(path),
                Cell::from(r.status_code.to_string()),
                Cell::from(format!("{}ms", r.response_ms)),
                Cell::from(r.status.label())
                    .style(app.theme.badge_style(r.status.badge()).add_modifier(Modifier::BOLD)),
            ])
            .style(row_style)
        })
        .collect();

    let widths = [
        Constraint::Length(24), // Timestamp
        Constraint::Length(16), // Source IP
        Constraint::Fill(3),    // Path
        Constraint::Length(5),  // Code
        Constraint::Length(8),  // Time
        Constraint::Length(8),  // Status
    ];

    let selected = app.selected_request_index.min(requests.len().saturating_sub(1));
    let position_info = if requests.is_empty() {
        String::new()
    } else {
        format!(" [{}/{}]", selected + 1, requests.len())
    };
    let skipped_info = if view.skipped_requests > 0 {
        format!(" ({} skipped)", view.skipped_requests)
    } else {
        String::new()
    };

    let title = format!(
        " Recent Requests ({}/{}){}{}{} ",
        requests.len(),
        view.requests.len(),
        skipped_info,
        filter_info(app),
        position_info
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(selected));

    frame.render_stateful_widget(table, area, &mut state);
}
