//! Detail overlay rendering.
//!
//! Displays a modal overlay with every field of the selected request.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::App;

use super::common::centered_rect;

/// Minimum width required for the detail overlay to render properly.
const MIN_OVERLAY_WIDTH: u16 = 50;
/// Minimum height required for the detail overlay to render properly.
const MIN_OVERLAY_HEIGHT: u16 = 14;

/// Render the request detail as a modal overlay.
pub fn render_overlay(frame: &mut Frame, app: &App, area: Rect) {
    if area.width < MIN_OVERLAY_WIDTH || area.height < MIN_OVERLAY_HEIGHT {
        return;
    }

    let Some(request) = app.selected_request() else {
        return;
    };

    let overlay_width = (area.width * 80 / 100).clamp(MIN_OVERLAY_WIDTH, 90);
    let overlay_height = MIN_OVERLAY_HEIGHT + 2;
    let overlay_area = centered_rect(overlay_width, overlay_height, area);

    frame.render_widget(Clear, overlay_area);

    let chunks = Layout::vertical([Constraint::Min(10), Constraint::Length(1)]).split(overlay_area);

    let label = |name: &'static str| Span::styled(format!(" {:<14}", name), app.theme.header);
    let dim = Style::default().add_modifier(Modifier::DIM);
    let optional = |value: Option<String>| match value {
        Some(v) => Span::raw(v),
        None => Span::styled("-", dim),
    };

    let lines = vec![
        Line::from(vec![label("Time"), Span::raw(request.time.clone())]),
        Line::from(vec![label("Source IP"), Span::raw(request.source_ip.clone())]),
        Line::from(vec![label("Method"), optional(request.method.clone())]),
        Line::from(vec![label("Path"), Span::raw(request.path.clone())]),
        Line::from(vec![
            label("Status Code"),
            Span::raw(request.status_code.to_string()),
        ]),
        Line::from(vec![
            label("Response Time"),
            Span::raw(format!("{}ms", request.response_ms)),
        ]),
        Line::from(vec![
            label("Status"),
            Span::styled(
                request.status.label(),
                app.theme.badge_style(request.status.badge()),
            ),
        ]),
        Line::from(vec![label("Gateway"), optional(request.gateway_id.clone())]),
        Line::from(vec![label("Prediction"), optional(request.prediction.clone())]),
        Line::from(vec![
            label("Confidence"),
            optional(request.confidence.map(|c| format!("{:.2}", c))),
        ]),
        Line::from(vec![label("User Agent"), optional(request.user_agent.clone())]),
    ];

    let block = Block::default()
        .title(format!(" Request from {} ", request.source_ip))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        chunks[0],
    );

    let footer = Paragraph::new(Line::from(vec![Span::styled(
        " ↑/↓:previous/next  Esc:close ",
        dim,
    )]));
    frame.render_widget(footer, chunks[1]);
}
