use super::{border_style, Panel};
use crate::feeds::NewsItem;
use crate::refresh::DashboardState;
use crate::ui::theme::{
    category_style, format_published, format_relevance, relevance_color, ACCENT,
};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

const SUMMARY_LINES: usize = 3;

pub struct ArticleList {
    title: String,
    scroll_state: ListState,
}

impl ArticleList {
    pub fn new() -> Self {
        let mut scroll_state = ListState::default();
        scroll_state.select(Some(0));

        Self {
            title: "Intelligence Ingest".to_string(),
            scroll_state,
        }
    }

    /// Back to the first card, used whenever a new batch replaces the list.
    pub fn reset(&mut self) {
        self.scroll_state.select(Some(0));
    }

    pub fn selected(&self) -> Option<usize> {
        self.scroll_state.selected()
    }

    pub fn selected_item<'a>(&self, state: &'a DashboardState) -> Option<&'a NewsItem> {
        self.selected().and_then(|i| state.items().get(i))
    }
}

impl Default for ArticleList {
    fn default() -> Self {
        Self::new()
    }
}

/// One card: category badge and match score, title, clamped summary, keywords, source and date.
pub fn card_lines(item: &NewsItem, width: usize) -> Vec<Line<'static>> {
    let palette = category_style(&item.category);
    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!(" {} ", item.category.as_str().to_uppercase()),
                Style::default()
                    .fg(palette.fg)
                    .bg(palette.bg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                format_relevance(item.relevance_score),
                Style::default().fg(relevance_color(item.relevance_score)),
            ),
        ]),
        Line::from(Span::styled(
            item.title.clone(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
    ];

    let wrapped = textwrap::wrap(&item.summary, width.max(10));
    let clamped = wrapped.len() > SUMMARY_LINES;
    for (i, line) in wrapped.iter().take(SUMMARY_LINES).enumerate() {
        let mut text = line.to_string();
        if clamped && i == SUMMARY_LINES - 1 {
            text.push('…');
        }
        lines.push(Line::from(Span::styled(
            text,
            Style::default().fg(Color::Gray),
        )));
    }

    if !item.keywords.is_empty() {
        let tags = item
            .keywords
            .iter()
            .map(|kw| format!("#{}", kw.to_lowercase()))
            .collect::<Vec<_>>()
            .join(" ");
        lines.push(Line::from(Span::styled(
            tags,
            Style::default().fg(Color::DarkGray),
        )));
    }

    lines.push(Line::from(vec![
        Span::styled(item.source.clone(), Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("  {}", format_published(&item.published_at)),
            Style::default().fg(Color::DarkGray),
        ),
    ]));
    lines.push(Line::from(""));

    lines
}

impl Panel for ArticleList {
    fn render(&self, frame: &mut Frame, area: Rect, state: &DashboardState, selected: bool) {
        let block = Block::default()
            .title(Line::from(vec![
                Span::styled(" ■ ", Style::default().fg(ACCENT)),
                Span::styled(
                    self.title.to_uppercase(),
                    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(" ({}) ", state.items().len())),
            ]))
            .borders(Borders::ALL)
            .border_style(border_style(selected));

        if state.is_loading() && state.items().is_empty() {
            let loading = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Establishing uplink to intelligence feeds...",
                    Style::default().fg(ACCENT),
                )),
            ])
            .alignment(Alignment::Center)
            .block(block);
            frame.render_widget(loading, area);
            return;
        }

        if state.items().is_empty() {
            let empty = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "ZERO RESULTS FOUND FOR QUERY",
                    Style::default().fg(Color::DarkGray),
                )),
                Line::from(Span::styled(
                    "d: reset feed",
                    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
                )),
            ])
            .alignment(Alignment::Center)
            .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let width = block.inner(area).width.saturating_sub(3) as usize;
        let items: Vec<ListItem> = state
            .items()
            .iter()
            .map(|item| ListItem::new(card_lines(item, width)))
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_symbol("▌ ")
            .highlight_style(Style::default().add_modifier(Modifier::BOLD));

        let mut list_state = self.scroll_state.clone();
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn scroll_up(&mut self) {
        if let Some(selected) = self.scroll_state.selected() {
            if selected > 0 {
                self.scroll_state.select(Some(selected - 1));
            }
        }
    }

    fn scroll_down(&mut self, state: &DashboardState) {
        if let Some(selected) = self.scroll_state.selected() {
            if selected < state.items().len().saturating_sub(1) {
                self.scroll_state.select(Some(selected + 1));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feeds::{Category, FeedData, Insights, NewsBatch};

    fn item(summary: &str, keywords: &[&str]) -> NewsItem {
        NewsItem {
            id: "1-0".to_string(),
            title: "X".to_string(),
            summary: summary.to_string(),
            source: "Z".to_string(),
            url: "http://a".to_string(),
            published_at: "2024-05-01T00:00:00Z".to_string(),
            category: Category::Breach,
            relevance_score: 90.0,
            sentiment: None,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_card_header_and_footer() {
        let lines = card_lines(&item("Y", &["CVE", "Patch"]), 40);
        assert_eq!(line_text(&lines[0]), " BREACH   Match: 90%");
        assert_eq!(line_text(&lines[1]), "X");
        assert_eq!(line_text(&lines[2]), "Y");
        assert_eq!(line_text(&lines[3]), "#cve #patch");
        assert_eq!(line_text(&lines[4]), "Z  2024-05-01");
    }

    #[test]
    fn test_card_summary_clamped() {
        let summary = "word ".repeat(60);
        let lines = card_lines(&item(&summary, &[]), 20);
        // badge, title, three summary lines, footer, spacer
        assert_eq!(lines.len(), 7);
        assert!(line_text(&lines[4]).ends_with('…'));
    }

    #[test]
    fn test_scroll_bounds() {
        let mut state = DashboardState::new();
        let ticket = state.begin(None);
        state.complete(
            ticket.seq,
            FeedData::Batch(NewsBatch {
                items: vec![item("a", &[]), item("b", &[])],
                insights: Insights::default(),
            }),
        );

        let mut list = ArticleList::new();
        list.scroll_up();
        assert_eq!(list.selected(), Some(0));
        list.scroll_down(&state);
        list.scroll_down(&state);
        assert_eq!(list.selected(), Some(1));
        assert_eq!(list.selected_item(&state).unwrap().summary, "b");
        list.reset();
        assert_eq!(list.selected(), Some(0));
    }
}
