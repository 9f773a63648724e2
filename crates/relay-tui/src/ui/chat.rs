//! Chat area
//!
//! Displays the conversation history and the in-progress assistant turn.

use ratatui::{
    Frame,
    layout::Rect,
    text::Line,
    widgets::{Block, Borders, Paragraph},
};
use relay_app::{App, ChatEntry, Role};

use super::wrap;
use crate::Theme;

const BORDER_SIZE: u16 = 2;
const STREAM_CURSOR: &str = "▊";

/// Render the chat area, pinned to the newest lines.
pub fn render(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let block = Block::default().borders(Borders::ALL);
    let width = area.width.saturating_sub(BORDER_SIZE) as usize;

    let mut lines: Vec<Line> = Vec::new();
    for entry in app.entries() {
        push_entry(&mut lines, entry, theme, width);
    }

    if !app.stream_buffer().is_empty() {
        lines.push(Line::styled("Claude", theme.assistant));
        let streamed = format!("{}{STREAM_CURSOR}", app.stream_buffer());
        lines.extend(wrap(&streamed, width).into_iter().map(|l| Line::styled(l, theme.stream)));
    }

    let visible_height = area.height.saturating_sub(BORDER_SIZE) as usize;
    let skip = lines.len().saturating_sub(visible_height);
    let visible: Vec<Line> = lines.into_iter().skip(skip).collect();

    frame.render_widget(Paragraph::new(visible).block(block), area);
}

fn push_entry(lines: &mut Vec<Line<'static>>, entry: &ChatEntry, theme: &Theme, width: usize) {
    match entry.role {
        Role::User => {
            lines.push(Line::styled("You", theme.user));
            lines.extend(wrap(&entry.content, width).into_iter().map(Line::raw));
        },
        Role::Assistant => {
            lines.push(Line::styled("Claude", theme.assistant));
            lines.extend(wrap(&entry.content, width).into_iter().map(Line::raw));
        },
        Role::Error => {
            let text = format!("Error: {}", entry.content);
            lines.extend(wrap(&text, width).into_iter().map(|l| Line::styled(l, theme.error)));
        },
    }
    lines.push(Line::default());
}
