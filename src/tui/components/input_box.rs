//! # InputBox Component
//!
//! Bordered text field used for the username on the login screen and for
//! composing chat messages.
//!
//! ## State Management
//!
//! The buffer and cursor are internal state. `title`, `locked` and
//! `placeholder` are props the parent refreshes every frame.
//!
//! Text is wrapped per character cell (not per word) so the terminal cursor
//! can be placed exactly. Only `MAX_VISIBLE_LINES` rows are shown; the view
//! scrolls to keep the cursor visible.

use std::ops::Range;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};
use unicode_width::UnicodeWidthChar;

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Border (2) + padding (2) consumed horizontally by the bordered block
const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders consumed vertically
const VERTICAL_OVERHEAD: u16 = 2;
/// Maximum visible content lines before internal scrolling kicks in
pub const MAX_VISIBLE_LINES: u16 = 5;
const DEFAULT_WIDTH: u16 = 80;

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Enter pressed. Carries the buffer as typed.
    Submit(String),
    /// Buffer contents changed.
    Changed,
    /// Only the cursor moved.
    Moved,
}

pub struct InputBox {
    buffer: String,
    /// Cursor position as byte offset in buffer (0..=buffer.len())
    pos: usize,
    /// First visible wrapped row
    scroll: u16,
    /// Content width from the last render (used for vertical movement)
    last_width: u16,
    /// Allow newlines (Ctrl+J / Shift+Enter / pasted)
    multiline: bool,
    /// Empty the buffer when Enter is pressed
    clear_on_submit: bool,
    pub title: String,
    pub placeholder: String,
    /// Ignores every edit and Enter while set.
    pub locked: bool,
}

impl InputBox {
    /// Single-line field that keeps its text after Enter.
    pub fn single_line(title: impl Into<String>) -> Self {
        Self::new(title.into(), false, false)
    }

    /// Multi-line composer that empties after Enter.
    pub fn composer(title: impl Into<String>) -> Self {
        Self::new(title.into(), true, true)
    }

    fn new(title: String, multiline: bool, clear_on_submit: bool) -> Self {
        Self {
            buffer: String::new(),
            pos: 0,
            scroll: 0,
            last_width: DEFAULT_WIDTH,
            multiline,
            clear_on_submit,
            title,
            placeholder: String::new(),
            locked: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.pos = 0;
        self.scroll = 0;
    }

    pub fn set_text(&mut self, text: &str) {
        self.buffer = text.to_string();
        self.pos = self.buffer.len();
    }

    /// Height for the given outer width, in `[3, MAX_VISIBLE_LINES + 2]`.
    pub fn calculate_height(&self, outer_width: u16) -> u16 {
        let rows = wrap_rows(&self.buffer, inner_width(outer_width)).len() as u16;
        rows.clamp(1, MAX_VISIBLE_LINES) + VERTICAL_OVERHEAD
    }

    fn insert_str(&mut self, text: &str) -> Option<InputEvent> {
        let text = if self.multiline {
            text.replace("\r\n", "\n")
        } else {
            text.replace(['\r', '\n'], " ")
        };
        self.buffer.insert_str(self.pos, &text);
        self.pos += text.len();
        Some(InputEvent::Changed)
    }

    fn move_to(&mut self, target: usize) -> Option<InputEvent> {
        (target != self.pos).then(|| {
            self.pos = target;
            InputEvent::Moved
        })
    }

    fn move_vertically(&mut self, down: bool) -> Option<InputEvent> {
        let rows = wrap_rows(&self.buffer, inner_width(self.last_width));
        let (row, col) = cursor_cell(&self.buffer, &rows, self.pos);
        let target = if down {
            row + 1
        } else {
            row.checked_sub(1)?
        };
        let range = rows.get(target)?.clone();
        self.move_to(byte_at_column(&self.buffer, range, col))
    }

    fn ensure_cursor_visible(&mut self, rows: &[Range<usize>]) {
        let (row, _) = cursor_cell(&self.buffer, rows, self.pos);
        let row = row as u16;
        if row < self.scroll {
            self.scroll = row;
        } else if row >= self.scroll + MAX_VISIBLE_LINES {
            self.scroll = row + 1 - MAX_VISIBLE_LINES;
        }
        let max_scroll = (rows.len() as u16).saturating_sub(MAX_VISIBLE_LINES);
        self.scroll = self.scroll.min(max_scroll);
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.last_width = area.width;
        let width = inner_width(area.width);
        let rows = wrap_rows(&self.buffer, width);
        self.ensure_cursor_visible(&rows);

        let border_style = if self.locked {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Cyan)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(self.title.as_str())
            .padding(Padding::horizontal(1));

        let paragraph = if self.buffer.is_empty() {
            Paragraph::new(Line::styled(
                self.placeholder.as_str(),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ))
        } else {
            let lines: Vec<Line> = rows
                .iter()
                .skip(self.scroll as usize)
                .take(MAX_VISIBLE_LINES as usize)
                .map(|r| Line::raw(&self.buffer[r.clone()]))
                .collect();
            Paragraph::new(lines)
        };
        let text_style = if self.locked {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };
        frame.render_widget(paragraph.style(text_style).block(block), area);

        if !self.locked && width > 0 {
            let (row, col) = cursor_cell(&self.buffer, &rows, self.pos);
            let visible_row = (row as u16).saturating_sub(self.scroll);
            frame.set_cursor_position((
                area.x + 2 + (col as u16).min(width.saturating_sub(1)),
                area.y + 1 + visible_row,
            ));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if self.locked {
            return None;
        }
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.insert(self.pos, *c);
                self.pos += c.len_utf8();
                Some(InputEvent::Changed)
            }
            TuiEvent::Newline if self.multiline => self.insert_str("\n"),
            TuiEvent::Paste(text) => self.insert_str(text),
            TuiEvent::Backspace => {
                if self.pos == 0 {
                    return None;
                }
                let prev = prev_char_boundary(&self.buffer, self.pos);
                self.buffer.drain(prev..self.pos);
                self.pos = prev;
                Some(InputEvent::Changed)
            }
            TuiEvent::Delete => {
                if self.pos >= self.buffer.len() {
                    return None;
                }
                let next = next_char_boundary(&self.buffer, self.pos);
                self.buffer.drain(self.pos..next);
                Some(InputEvent::Changed)
            }
            TuiEvent::CursorLeft => self.move_to(prev_char_boundary(&self.buffer, self.pos)),
            TuiEvent::CursorRight => self.move_to(next_char_boundary(&self.buffer, self.pos)),
            TuiEvent::WordLeft => self.move_to(prev_word_boundary(&self.buffer, self.pos)),
            TuiEvent::WordRight => self.move_to(next_word_boundary(&self.buffer, self.pos)),
            TuiEvent::Home => {
                let line_start = self.buffer[..self.pos]
                    .rfind('\n')
                    .map(|i| i + 1)
                    .unwrap_or(0);
                self.move_to(line_start)
            }
            TuiEvent::End => {
                let line_end = self.buffer[self.pos..]
                    .find('\n')
                    .map(|i| self.pos + i)
                    .unwrap_or(self.buffer.len());
                self.move_to(line_end)
            }
            TuiEvent::CursorUp if self.multiline => self.move_vertically(false),
            TuiEvent::CursorDown if self.multiline => self.move_vertically(true),
            TuiEvent::Submit => {
                let text = if self.clear_on_submit {
                    let text = std::mem::take(&mut self.buffer);
                    self.pos = 0;
                    self.scroll = 0;
                    text
                } else {
                    self.buffer.clone()
                };
                Some(InputEvent::Submit(text))
            }
            _ => None,
        }
    }
}

// ============================================================================
// Wrapping helpers
// ============================================================================

fn inner_width(outer_width: u16) -> u16 {
    outer_width.saturating_sub(HORIZONTAL_OVERHEAD)
}

/// Splits `text` into visual rows of at most `width` cells.
///
/// Each row is a byte range into `text`, newline excluded. A row that fills
/// the width exactly is followed by an empty row so a cursor at its end has
/// somewhere to sit.
fn wrap_rows(text: &str, width: u16) -> Vec<Range<usize>> {
    let width = width.max(1) as usize;
    let mut rows = Vec::new();
    let mut offset = 0;

    for line in text.split('\n') {
        let mut start = offset;
        let mut used = 0;
        for (i, ch) in line.char_indices() {
            let w = ch.width().unwrap_or(0);
            if used + w > width {
                rows.push(start..offset + i);
                start = offset + i;
                used = 0;
            }
            used += w;
        }
        let end = offset + line.len();
        rows.push(start..end);
        if used == width {
            rows.push(end..end);
        }
        offset = end + 1;
    }
    rows
}

/// Row and display column of byte offset `pos`.
fn cursor_cell(text: &str, rows: &[Range<usize>], pos: usize) -> (usize, usize) {
    for (idx, row) in rows.iter().enumerate() {
        let continues_here = rows.get(idx + 1).is_some_and(|next| next.start == pos);
        if row.start <= pos && pos <= row.end && !(pos == row.end && continues_here) {
            return (idx, display_width(&text[row.start..pos]));
        }
    }
    let last = rows.len().saturating_sub(1);
    (last, 0)
}

fn byte_at_column(text: &str, row: Range<usize>, column: usize) -> usize {
    let mut used = 0;
    for (i, ch) in text[row.clone()].char_indices() {
        let w = ch.width().unwrap_or(0);
        if used + w > column {
            return row.start + i;
        }
        used += w;
    }
    row.end
}

fn display_width(text: &str) -> usize {
    text.chars().map(|c| c.width().unwrap_or(0)).sum()
}

fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map(|c| pos + c.len_utf8())
        .unwrap_or(text.len())
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// readline `backward-word`: skip separators, then the word.
fn prev_word_boundary(text: &str, pos: usize) -> usize {
    let mut boundary = pos;
    let mut in_word = false;
    for (i, c) in text[..pos].char_indices().rev() {
        if is_word_char(c) {
            in_word = true;
        } else if in_word {
            break;
        }
        boundary = i;
    }
    boundary
}

/// readline `forward-word`: skip separators, then the word.
fn next_word_boundary(text: &str, pos: usize) -> usize {
    let mut in_word = false;
    for (i, c) in text[pos..].char_indices() {
        if is_word_char(c) {
            in_word = true;
        } else if in_word {
            return pos + i;
        }
    }
    text.len()
}
