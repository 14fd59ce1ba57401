use crate::ui::theme::ACCENT;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const PLACEHOLDER: &str = "Search threats, CVEs, or entities...";

/// Header bar with the free-text search box.
#[derive(Debug, Clone, Default)]
pub struct SearchBar {
    input: String,
    editing: bool,
}

impl SearchBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self) {
        self.editing = true;
    }

    pub fn close(&mut self) {
        self.editing = false;
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn add_char(&mut self, c: char) {
        if self.editing {
            self.input.push(c);
        }
    }

    pub fn delete_char(&mut self) {
        if self.editing {
            self.input.pop();
        }
    }

    /// Close the box and hand back the query. Blank input submits nothing and keeps the box open.
    pub fn submit(&mut self) -> Option<String> {
        let query = self.input.trim();
        if query.is_empty() {
            return None;
        }
        let query = query.to_string();
        self.editing = false;
        Some(query)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, loading: bool) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(34), Constraint::Min(20)])
            .split(area);

        let brand = Paragraph::new(vec![
            Line::from(vec![
                Span::styled(
                    "CYBERSHIELD ",
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled("INTEL", Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
            ]),
            Line::from(Span::styled(
                "GLOBAL THREAT AGGREGATOR",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .block(Block::default().borders(Borders::BOTTOM));
        frame.render_widget(brand, chunks[0]);

        let border = if self.editing { ACCENT } else { Color::DarkGray };
        let mut title = vec![Span::raw(" / search ")];
        if loading {
            title.push(Span::styled("⟳ syncing ", Style::default().fg(ACCENT)));
        }

        let text = if self.input.is_empty() && !self.editing {
            Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray))
        } else if self.editing {
            Span::styled(format!("{}▏", self.input), Style::default().fg(Color::White))
        } else {
            Span::styled(self.input.clone(), Style::default().fg(Color::Gray))
        };

        let search = Paragraph::new(Line::from(text)).block(
            Block::default()
                .title(Line::from(title))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        );
        frame.render_widget(search, chunks[1]);
    }
}
