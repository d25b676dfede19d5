//! Overview rendering.
//!
//! Displays the four summary cards, the hourly request trend, and the
//! gateway table.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;
use crate::data::{DashboardView, HourlyTrend};

use super::common::render_empty;

/// Sparkline characters (8 levels of height).
const SPARKLINE_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render the Overview.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref view) = app.view else {
        return;
    };

    let trend_height = if view.hourly.levels.is_empty() { 0 } else { 4 };
    let chunks = Layout::vertical([
        Constraint::Length(5),
        Constraint::Length(trend_height),
        Constraint::Min(4),
    ])
    .split(area);

    render_cards(frame, app, view, chunks[0]);
    if trend_height > 0 {
        render_trend(frame, app, &view.hourly, chunks[1]);
    }
    render_gateways(frame, app, view, chunks[2]);
}

fn render_cards(frame: &mut Frame, app: &App, view: &DashboardView, area: Rect) {
    let summary = &view.summary;
    let cards = [
        (
            "Total Requests",
            summary.total_requests.to_string(),
            Style::default().fg(app.theme.highlight),
            match summary.window_hours {
                Some(h) => format!("Last {} hours", h),
                None => "All gateways".to_string(),
            },
        ),
        (
            "Blocked Requests",
            summary.blocked_requests.to_string(),
            Style::default().fg(app.theme.danger),
            format!("{}% block rate", summary.block_rate_percent),
        ),
        (
            "Unique IPs",
            summary.unique_ips.to_string(),
            Style::default().fg(app.theme.warning),
            "Distinct sources".to_string(),
        ),
        (
            "Avg Response",
            format!("{}ms", summary.avg_response_ms),
            Style::default().fg(app.theme.success),
            "Latency".to_string(),
        ),
    ];

    let columns = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(area);
    for ((title, value, style, caption), column) in cards.into_iter().zip(columns.iter()) {
        let block = Block::default()
            .title(format!(" {} ", title))
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border));
        let lines = vec![
            Line::from(Span::styled(value, style.add_modifier(Modifier::BOLD))),
            Line::from(Span::styled(caption, Style::default().fg(app.theme.muted))),
        ];
        frame.render_widget(Paragraph::new(lines).block(block), *column);
    }
}

fn render_trend(frame: &mut Frame, app: &App, trend: &HourlyTrend, area: Rect) {
    let peak = trend.totals.iter().copied().max().unwrap_or(0);
    let blocked: u64 = trend.blocked.iter().sum();

    let span = match (trend.labels.first(), trend.labels.last()) {
        (Some(first), Some(last)) => format!("{} - {}", first, last),
        _ => String::new(),
    };

    let lines = vec![
        Line::from(Span::styled(
            render_sparkline(&trend.levels),
            Style::default().fg(app.theme.highlight),
        )),
        Line::from(Span::styled(
            format!("{}  peak {}/h  blocked {}", span, peak, blocked),
            Style::default().fg(app.theme.muted),
        )),
    ];

    let block = Block::default()
        .title(" Hourly Requests ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_gateways(frame: &mut Frame, app: &App, view: &DashboardView, area: Rect) {
    if view.gateways.is_empty() {
        render_empty(frame, app, area, "Gateway Statistics", "No gateway activity in window");
        return;
    }

    let header = Row::new(vec![
        Cell::from("Gateway ID"),
        Cell::from("Request Count"),
        Cell::from("Status"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = view
        .gateways
        .iter()
        .map(|g| {
            Row::new(vec![
                Cell::from(g.gateway_id.clone()),
                Cell::from(g.request_count.to_string()),
                Cell::from(g.status.label()).style(app.theme.badge_style(g.status.badge())),
            ])
        })
        .collect();

    let widths = [Constraint::Fill(3), Constraint::Fill(1), Constraint::Min(8)];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(format!(" Gateway Statistics ({}) ", view.gateways.len()))
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border)),
    );

    frame.render_widget(table, area);
}

/// Render sparkline from levels (0-7).
fn render_sparkline(levels: &[u8]) -> String {
    levels
        .iter()
        .map(|&l| SPARKLINE_CHARS[(l as usize).min(7)])
        .collect()
}
