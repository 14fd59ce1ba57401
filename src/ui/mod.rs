pub mod theme;
pub mod widgets;

use crate::app::{App, Focus};
use crate::refresh::Status;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use std::time::Instant;
use theme::ACCENT;
use widgets::Panel;

pub fn draw(frame: &mut Frame, app: &App) {
    let banner_height = if app.state.error().is_some() { 3 } else { 0 };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(banner_height),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(frame.area());

    app.search.render(frame, rows[0], app.state.is_loading());

    if let Some(error) = app.state.error() {
        render_error_banner(frame, rows[1], error);
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(rows[2]);

    app.articles.render(
        frame,
        columns[0],
        &app.state,
        app.focus == Focus::Articles,
    );

    let sidebar = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(12),
            Constraint::Length(app.filters.len() as u16 + 2),
        ])
        .split(columns[1]);

    app.threat_meter.render(frame, sidebar[0], &app.state);
    app.filters.render(
        frame,
        sidebar[1],
        &app.state,
        app.focus == Focus::Filters,
    );

    render_status_bar(frame, rows[3], app);
}

fn render_error_banner(frame: &mut Frame, area: Rect, error: &str) {
    let banner = Paragraph::new(Line::from(vec![
        Span::styled("⚠ ", Style::default().fg(Color::Red)),
        Span::styled(error.to_string(), Style::default().fg(Color::LightRed)),
        Span::styled(
            "   r: retry handshake  x: dismiss",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::UNDERLINED),
        ),
    ]))
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    );
    frame.render_widget(banner, area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let status = match app.state.status() {
        Status::Loading => Span::styled("SYNCING", Style::default().fg(ACCENT)),
        Status::Error => Span::styled("DEGRADED", Style::default().fg(Color::Red)),
        Status::Loaded => Span::styled("SYSTEM READY", Style::default().fg(Color::Green)),
    };

    let synced = app
        .state
        .last_synced()
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".to_string());

    let remaining = app.timer.remaining(Instant::now()).as_secs();
    let query = app.state.last_query().unwrap_or("default feed");

    let mut spans = vec![
        status,
        Span::styled(
            format!(
                " | SYNC: {} | NEXT: {:02}:{:02} | QUERY: {} | ",
                synced,
                remaining / 60,
                remaining % 60,
                query
            ),
            Style::default().fg(Color::DarkGray),
        ),
    ];

    match &app.status_message {
        Some(message) => spans.push(Span::styled(
            message.clone(),
            Style::default().fg(Color::Yellow),
        )),
        None => spans.push(Span::styled(
            "/ search  1-5 filters  tab focus  o open  r retry  d reset  q quit",
            Style::default().fg(Color::DarkGray),
        )),
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
