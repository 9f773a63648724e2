//! Input line
//!
//! Displays the draft with a prompt and places the terminal cursor.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use relay_app::Draft;
use unicode_width::UnicodeWidthChar;

use crate::Theme;

const PROMPT: &str = "> ";
const PROMPT_WIDTH: u16 = 3; // border + "> "
const INPUT_LINE_OFFSET_Y: u16 = 1; // inside top border
const RIGHT_PADDING: u16 = 1; // inside right border

/// Render the input line.
pub fn render(frame: &mut Frame, draft: &Draft, theme: &Theme, area: Rect) {
    let block = Block::default().borders(Borders::ALL);

    let line = Line::from(vec![
        Span::styled(PROMPT, theme.input_prompt),
        Span::raw(draft.text().to_owned()),
    ]);
    frame.render_widget(Paragraph::new(line).block(block), area);

    let available_width = area.width.saturating_sub(PROMPT_WIDTH + RIGHT_PADDING);
    let cursor_offset = cursor_column(draft).min(available_width);

    let cursor_x = area.x.saturating_add(PROMPT_WIDTH).saturating_add(cursor_offset);
    let cursor_y = area.y.saturating_add(INPUT_LINE_OFFSET_Y);
    let max_x = area.x.saturating_add(area.width).saturating_sub(RIGHT_PADDING);
    let cursor_x = cursor_x.min(max_x);

    frame.set_cursor_position((cursor_x, cursor_y));
}

/// Display columns between the prompt and the cursor.
fn cursor_column(draft: &Draft) -> u16 {
    let width: usize =
        draft.text().chars().take(draft.cursor()).map(|c| c.width().unwrap_or(0)).sum();
    u16::try_from(width).unwrap_or(u16::MAX)
}
