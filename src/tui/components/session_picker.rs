//! # Session Picker Component
//!
//! Full-screen list of past conversations. Enter reopens the highlighted
//! session, `r` refreshes, Esc goes back to the dashboard.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `SessionPickerState` lives in `TuiState`
//! - `SessionPicker` is created each frame with borrowed state

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, List, ListItem, ListState, Padding, Paragraph};

use crate::api::ChatSessionSummary;
use crate::core::history::format_timestamp;
use crate::core::state::Fetch;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::mood_badge::badge;
use crate::tui::event::TuiEvent;

pub const EMPTY_SESSIONS_MESSAGE: &str = "No past conversations yet.";

/// Persistent cursor for the picker.
#[derive(Default)]
pub struct SessionPickerState {
    pub list_state: ListState,
    len: usize,
}

impl SessionPickerState {
    /// Keeps the cursor inside a list of `len` sessions.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        match (len, self.list_state.selected()) {
            (0, _) => self.list_state.select(None),
            (_, None) => self.list_state.select(Some(0)),
            (_, Some(i)) if i >= len => self.list_state.select(Some(len - 1)),
            _ => {}
        }
    }

    pub fn reset(&mut self) {
        self.list_state = ListState::default();
        self.set_len(self.len);
    }
}

/// Events emitted by the session picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPickerEvent {
    Resume(usize),
    Refresh,
    Dismiss,
}

impl EventHandler for SessionPickerState {
    type Event = SessionPickerEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::Escape => Some(SessionPickerEvent::Dismiss),
            TuiEvent::InputChar('r') => Some(SessionPickerEvent::Refresh),
            TuiEvent::CursorUp | TuiEvent::ScrollUp => {
                if self.len > 0 {
                    let i = self.list_state.selected().unwrap_or(0).saturating_sub(1);
                    self.list_state.select(Some(i));
                }
                None
            }
            TuiEvent::CursorDown | TuiEvent::ScrollDown => {
                if self.len > 0 {
                    let i = (self.list_state.selected().unwrap_or(0) + 1).min(self.len - 1);
                    self.list_state.select(Some(i));
                }
                None
            }
            TuiEvent::Submit => self
                .list_state
                .selected()
                .filter(|&i| i < self.len)
                .map(SessionPickerEvent::Resume),
            _ => None,
        }
    }
}

/// Transient render wrapper for the picker.
pub struct SessionPicker<'a> {
    pub sessions: &'a Fetch<Vec<ChatSessionSummary>>,
    pub state: &'a mut SessionPickerState,
    /// A transcript is being fetched
    pub is_loading: bool,
}

fn session_line(session: &ChatSessionSummary) -> Line<'static> {
    let dim = Style::default().fg(Color::DarkGray);
    let started = session
        .started_at
        .as_deref()
        .map(format_timestamp)
        .unwrap_or_else(|| String::from("unknown date"));

    let mut spans = vec![Span::styled(format!("{started:<24}"), dim)];
    spans.extend(badge(&session.mood));
    if session.ended_at.is_none() {
        spans.push(Span::styled("  (open)", Style::default().fg(Color::Cyan)));
    }
    Line::from(spans)
}

impl<'a> Component for SessionPicker<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let help_text = if self.is_loading {
            " Opening conversation... "
        } else {
            " Enter Open  r Refresh  Esc Back "
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Past Conversations ")
            .title_bottom(Line::from(help_text).centered())
            .padding(Padding::new(2, 2, 1, 0));

        let message = |text: String, style: Style| {
            Paragraph::new(Line::styled(text, style))
                .alignment(Alignment::Center)
                .block(block.clone())
        };
        let dim = Style::default().fg(Color::DarkGray);

        let sessions = match self.sessions {
            Fetch::Idle | Fetch::Loading => {
                frame.render_widget(message("Loading conversations...".to_string(), dim), area);
                return;
            }
            Fetch::Failed(err) => {
                frame.render_widget(
                    message(
                        format!("Error loading conversations: {err}"),
                        Style::default().fg(Color::Red),
                    ),
                    area,
                );
                return;
            }
            Fetch::Loaded(sessions) if sessions.is_empty() => {
                self.state.set_len(0);
                frame.render_widget(message(EMPTY_SESSIONS_MESSAGE.to_string(), dim), area);
                return;
            }
            Fetch::Loaded(sessions) => sessions,
        };

        self.state.set_len(sessions.len());
        let items: Vec<ListItem> = sessions.iter().map(|s| ListItem::new(session_line(s))).collect();
        let list = List::new(items)
            .block(block)
            .highlight_symbol("▶ ")
            .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED));
        frame.render_stateful_widget(list, area, &mut self.state.list_state);
    }
}
