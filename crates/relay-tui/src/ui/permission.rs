//! Permission box
//!
//! Shown in place of the input line while a tool is waiting for approval.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Padding, Paragraph},
};
use relay_proto::PermissionRequest;

use super::wrap;
use crate::Theme;

const MIN_BOX_WIDTH: u16 = 40;
const MAX_BOX_WIDTH: u16 = 80;
const MARGIN: u16 = 4;
const PADDING_X: u16 = 2;
const PADDING_Y: u16 = 1;
const BORDER_SIZE: u16 = 2;

/// Tool input is cut to this many characters before display.
const MAX_INPUT_CHARS: usize = 500;

/// Rows the box needs at terminal width `width`.
#[allow(clippy::cast_possible_truncation)]
pub fn height(request: &PermissionRequest, width: u16) -> u16 {
    let lines = lines(request, &Theme::default(), inner_width(width)).len() as u16;
    lines.saturating_add(2 * PADDING_Y + BORDER_SIZE)
}

/// Render the permission box.
pub fn render(frame: &mut Frame, request: &PermissionRequest, theme: &Theme, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.permission_border)
        .padding(Padding::new(PADDING_X, PADDING_X, PADDING_Y, PADDING_Y));

    let box_area = Rect { width: box_width(area.width).min(area.width), ..area };
    let text = lines(request, theme, inner_width(area.width));

    frame.render_widget(Paragraph::new(text).block(block), box_area);
}

fn box_width(width: u16) -> u16 {
    width.saturating_sub(MARGIN).clamp(MIN_BOX_WIDTH, MAX_BOX_WIDTH)
}

fn inner_width(width: u16) -> usize {
    box_width(width).min(width).saturating_sub(2 * PADDING_X + BORDER_SIZE) as usize
}

fn lines(request: &PermissionRequest, theme: &Theme, width: usize) -> Vec<Line<'static>> {
    let description = if request.description.is_empty() {
        format!("Tool {} wants to execute", request.tool_name)
    } else {
        request.description.clone()
    };

    let mut lines = vec![
        Line::styled("⚠ Permission Request", theme.permission_title),
        Line::default(),
        Line::from(vec![
            Span::raw("Tool: "),
            Span::styled(request.tool_name.clone(), theme.permission_tool),
        ]),
    ];
    lines.extend(wrap(&format!("Description: {description}"), width).into_iter().map(Line::raw));
    lines.push(Line::default());

    let input = format_tool_input(&request.tool_input);
    if !input.is_empty() && input != "null" {
        lines.push(Line::raw("Input:"));
        lines.extend(wrap(&input, width).into_iter().map(Line::raw));
        lines.push(Line::default());
    }

    lines.push(Line::raw("[y] Allow  [n] Deny"));
    lines
}

/// Compact JSON, cut to [`MAX_INPUT_CHARS`] characters with a `...` marker.
fn format_tool_input(value: &serde_json::Value) -> String {
    let text = value.to_string();
    match text.char_indices().nth(MAX_INPUT_CHARS) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text,
    }
}
