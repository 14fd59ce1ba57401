pub mod articles;
pub mod filters;
pub mod search;
pub mod threat_meter;

use crate::refresh::DashboardState;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    Frame,
};

/// A dashboard panel that can take keyboard focus.
pub trait Panel {
    fn render(&self, frame: &mut Frame, area: Rect, state: &DashboardState, selected: bool);

    fn scroll_up(&mut self);

    fn scroll_down(&mut self, state: &DashboardState);
}

pub(crate) fn border_style(selected: bool) -> Style {
    if selected {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}
