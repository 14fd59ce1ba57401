use super::{border_style, Panel};
use crate::refresh::DashboardState;
use crate::ui::theme::ACCENT;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Preset queries, runnable by number or by selecting one and pressing Enter.
pub struct QuickFilters {
    title: String,
    filters: Vec<String>,
    selected: usize,
}

impl QuickFilters {
    pub fn new(filters: Vec<String>) -> Self {
        Self {
            title: "Quick Filters".to_string(),
            filters,
            selected: 0,
        }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.filters.get(index).map(String::as_str)
    }

    pub fn selected_query(&self) -> Option<&str> {
        self.get(self.selected)
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl Panel for QuickFilters {
    fn render(&self, frame: &mut Frame, area: Rect, state: &DashboardState, selected: bool) {
        let block = Block::default()
            .title(format!(" {} ", self.title.to_uppercase()))
            .borders(Borders::ALL)
            .border_style(border_style(selected));

        let active = state.last_query();
        let items: Vec<ListItem> = self
            .filters
            .iter()
            .enumerate()
            .map(|(i, filter)| {
                let highlighted = selected && i == self.selected;
                let is_active = active == Some(filter.as_str());
                let style = if highlighted {
                    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
                } else if is_active {
                    Style::default().fg(Color::White)
                } else {
                    Style::default().fg(Color::Gray)
                };

                let mut spans = vec![
                    Span::styled(format!("{} ", i + 1), Style::default().fg(Color::DarkGray)),
                    Span::styled(filter.clone(), style),
                ];
                if highlighted {
                    spans.push(Span::styled(" →", Style::default().fg(ACCENT)));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        frame.render_widget(List::new(items).block(block), area);
    }

    fn scroll_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn scroll_down(&mut self, _state: &DashboardState) {
        if self.selected + 1 < self.filters.len() {
            self.selected += 1;
        }
    }
}
