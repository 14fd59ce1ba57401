use super::border_style;
use crate::refresh::DashboardState;
use crate::ui::theme::threat_gauge;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

pub struct ThreatMeter {
    title: String,
}

impl ThreatMeter {
    pub fn new() -> Self {
        Self {
            title: "Global Status".to_string(),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, state: &DashboardState) {
        let insights = state.insights();
        let gauge = threat_gauge(insights.map(|i| &i.threat_level));

        let block = Block::default()
            .title(Line::from(vec![
                Span::raw(format!(" {} ", self.title.to_uppercase())),
                Span::styled(
                    format!("[{}]", gauge.label.to_uppercase()),
                    Style::default()
                        .fg(gauge.badge)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
            ]))
            .borders(Borders::ALL)
            .border_style(border_style(false));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(4),
            ])
            .split(inner);

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                format!("ACTIVE RISK {}", gauge.risk),
                Style::default().fg(Color::DarkGray),
            ))),
            chunks[0],
        );

        let bar = Gauge::default()
            .gauge_style(Style::default().fg(gauge.bar).bg(Color::Black))
            .ratio(gauge.fill)
            .label("");
        frame.render_widget(bar, chunks[1]);

        let summary = insights
            .map(|i| i.summary.as_str())
            .unwrap_or("Scanning global vectors for anomalies...");
        let pulse = Paragraph::new(vec![
            Line::from(Span::styled(
                "AI PULSE SUMMARY",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("\"{}\"", summary),
                Style::default()
                    .fg(Color::Gray)
                    .add_modifier(Modifier::ITALIC),
            )),
        ])
        .wrap(Wrap { trim: true });
        frame.render_widget(pulse, chunks[3]);

        let trends = match insights {
            Some(insights) => Line::from(
                insights
                    .top_trends
                    .iter()
                    .flat_map(|trend| {
                        [
                            Span::styled(
                                format!(" {} ", trend),
                                Style::default().fg(Color::White).bg(Color::DarkGray),
                            ),
                            Span::raw(" "),
                        ]
                    })
                    .collect::<Vec<_>>(),
            ),
            None => Line::from(Span::styled(
                "Pending ingest...",
                Style::default().fg(Color::DarkGray),
            )),
        };
        let vectors = Paragraph::new(vec![
            Line::from(Span::styled(
                "EMERGING VECTORS",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )),
            trends,
        ])
        .wrap(Wrap { trim: false });
        frame.render_widget(vectors, chunks[4]);
    }
}

impl Default for ThreatMeter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feeds::{FeedData, NewsBatch, ThreatLevel};
    use ratatui::{backend::TestBackend, Terminal};

    fn rendered(state: &DashboardState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(48, 16)).unwrap();
        terminal
            .draw(|frame| ThreatMeter::new().render(frame, frame.area(), state))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_render_before_first_load() {
        let screen = rendered(&DashboardState::new());
        assert!(screen.contains("GLOBAL STATUS"));
        assert!(screen.contains("[SECURE]"));
        assert!(screen.contains("ACTIVE RISK 12%"));
        assert!(screen.contains("Pending ingest..."));
    }

    #[test]
    fn test_render_loaded_insights() {
        let mut state = DashboardState::new();
        let ticket = state.begin(None);
        let mut batch = NewsBatch::default();
        batch.insights.threat_level = ThreatLevel::High;
        batch.insights.top_trends = vec!["phishing".to_string()];
        state.complete(ticket.seq, FeedData::Batch(batch));

        let screen = rendered(&state);
        assert!(screen.contains("[HIGH]"));
        assert!(screen.contains("ACTIVE RISK 75%"));
        assert!(screen.contains("phishing"));
    }
}
