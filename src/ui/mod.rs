mod help;
mod modal;
mod results;

use crate::app::App;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Position, Rect},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Rows taken by one card in the results list (three lines plus a spacer).
pub const CARD_HEIGHT: u16 = 4;
const MAX_VISIBLE_MESSAGES: usize = 4;

/// Screen regions of the main view.
#[derive(Debug, Clone, Copy)]
pub struct Areas {
    pub header: Rect,
    pub search: Rect,
    pub messages: Rect,
    pub cards: Rect,
    pub status: Rect,
}

/// Top-level render dispatch.
pub fn render<A>(app: &App<A>, frame: &mut Frame) {
    results::render(app, frame);

    if let Some(ref recipe) = app.modal {
        modal::render(recipe, app.modal_scroll, frame);
    }

    // Render help overlay on top if active
    if app.show_help {
        help::render(frame);
    }
}

/// Layout: header(3) + search(3) + messages(0..6) + cards(min) + status(1)
pub fn layout<A>(app: &App<A>, area: Rect) -> Areas {
    let shown = app.results.messages.len().min(MAX_VISIBLE_MESSAGES) as u16;
    let messages_height = if shown == 0 { 0 } else { shown + 2 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(messages_height),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    Areas {
        header: chunks[0],
        search: chunks[1],
        messages: chunks[2],
        cards: chunks[3],
        status: chunks[4],
    }
}

/// Cards that fit inside the bordered card list.
pub fn cards_per_page(cards_area: Rect) -> usize {
    (cards_area.height.saturating_sub(2) / CARD_HEIGHT).max(1) as usize
}

/// Index of the first card on the page holding the selection.
pub fn page_start(selected: usize, per_page: usize) -> usize {
    (selected / per_page) * per_page
}

/// Card under a mouse click, using the same layout the last frame used.
pub fn card_at<A>(app: &App<A>, area: Rect, column: u16, row: u16) -> Option<usize> {
    let cards = layout(app, area).cards;
    let inner = Rect::new(
        cards.x + 1,
        cards.y + 1,
        cards.width.saturating_sub(2),
        cards.height.saturating_sub(2),
    );
    if !inner.contains(Position::new(column, row)) {
        return None;
    }
    let per_page = cards_per_page(cards);
    let offset = ((row - inner.y) / CARD_HEIGHT) as usize;
    if offset >= per_page {
        return None;
    }
    let index = page_start(app.selected, per_page) + offset;
    (index < app.results.cards.len()).then_some(index)
}

/// Whether a click at (`column`, `row`) should dismiss the modal: outside
/// its content area, or on the close marker.
pub fn click_dismisses_modal(area: Rect, column: u16, row: u16) -> bool {
    let position = Position::new(column, row);
    let modal = modal::area(area);
    !modal.contains(position) || modal::close_marker(modal).contains(position)
}

/// Create a centered rectangle using percentage of parent area.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}

/// Truncate a string to `max_width` display columns, adding "…" if truncated.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let budget = max_width.saturating_sub(1);
    let mut used = 0;
    let mut result = String::new();
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        result.push(c);
    }
    result.push('…');
    result
}
