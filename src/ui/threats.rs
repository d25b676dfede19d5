//! Threats view rendering.
//!
//! Lists the top blocked source IPs with their threat level.

use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::App;

use super::common::{filter_info, render_empty};

/// Render the Threats view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref view) = app.view else {
        return;
    };

    if view.threats.is_empty() {
        render_empty(frame, app, area, "Top Threats", "No blocked sources in window");
        return;
    }

    let threats = app.filtered_threats();

    let header = Row::new(vec![
        Cell::from("IP Address"),
        Cell::from("Block Count"),
        Cell::from("Threat Level"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = threats
        .iter()
        .map(|t| {
            Row::new(vec![
                Cell::from(t.source_ip.clone()),
                Cell::from(t.count.to_string()),
                Cell::from(t.level.label()).style(app.theme.badge_style(t.level.badge())),
            ])
        })
        .collect();

    let widths = [Constraint::Fill(2), Constraint::Fill(1), Constraint::Min(12)];

    let selected = app.selected_threat_index.min(threats.len().saturating_sub(1));
    let position_info = if threats.is_empty() {
        String::new()
    } else {
        format!(" [{}/{}]", selected + 1, threats.len())
    };

    let title = format!(
        " Top Threats ({}/{}){}{} ",
        threats.len(),
        view.threats.len(),
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
