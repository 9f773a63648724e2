//! UI rendering
//!
//! Rendering functions that convert App state into terminal output using
//! ratatui widgets. All functions are pure (no I/O), taking state and a
//! [`Theme`] and drawing into the frame.

mod chat;
mod input;
mod permission;
mod status;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use unicode_width::UnicodeWidthChar;

use crate::{App, Theme};

/// Render the entire UI.
///
/// Status bar on top, chat history below it, and either the permission box
/// or the input line at the bottom.
pub fn render(frame: &mut Frame, app: &App, theme: &Theme, server_name: &str) {
    const STATUS_HEIGHT: u16 = 1;
    const CHAT_AREA_MIN_HEIGHT: u16 = 3;
    const INPUT_HEIGHT: u16 = 3;

    let area = frame.area();
    let bottom_height = app
        .pending_permission()
        .map_or(INPUT_HEIGHT, |request| permission::height(request, area.width));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(STATUS_HEIGHT),
            Constraint::Min(CHAT_AREA_MIN_HEIGHT),
            Constraint::Length(bottom_height),
        ])
        .split(area);

    let [status_area, chat_area, bottom_area] = chunks.as_ref() else {
        return;
    };

    status::render(frame, app, theme, server_name, *status_area);
    chat::render(frame, app, theme, *chat_area);

    match app.pending_permission() {
        Some(request) => permission::render(frame, request, theme, *bottom_area),
        None => input::render(frame, app.draft(), theme, *bottom_area),
    }
}

/// Split `text` into lines no wider than `width` display columns.
///
/// Embedded newlines always break. A zero width disables wrapping.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for line in text.split('\n') {
        if width == 0 {
            lines.push(line.to_owned());
            continue;
        }

        let mut current = String::new();
        let mut used = 0;
        for c in line.chars() {
            let columns = c.width().unwrap_or(0);
            if used + columns > width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                used = 0;
            }
            current.push(c);
            used += columns;
        }
        lines.push(current);
    }

    lines
}
