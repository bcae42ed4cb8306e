//! # Menu Component
//!
//! Vertical list of choices with a highlighted cursor. Used by the dashboard
//! and the result screen.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `MenuState` lives in `TuiState` and handles keys
//! - `Menu` is created each frame with the labels and borrowed state

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{List, ListItem, ListState};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

pub struct MenuState {
    len: usize,
    pub list_state: ListState,
}

impl MenuState {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            list_state: ListState::default().with_selected((len > 0).then_some(0)),
        }
    }

    pub fn selected(&self) -> usize {
        self.list_state.selected().unwrap_or(0)
    }

    pub fn reset(&mut self) {
        self.list_state.select((self.len > 0).then_some(0));
    }
}

/// Emits the index of the activated entry.
impl EventHandler for MenuState {
    type Event = usize;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if self.len == 0 {
            return None;
        }
        match event {
            TuiEvent::CursorUp => {
                self.list_state.select(Some(self.selected().saturating_sub(1)));
                None
            }
            TuiEvent::CursorDown => {
                self.list_state
                    .select(Some((self.selected() + 1).min(self.len - 1)));
                None
            }
            TuiEvent::Submit => Some(self.selected()),
            // 1-based shortcuts
            TuiEvent::InputChar(c) => {
                let index = c.to_digit(10)? as usize;
                (1..=self.len).contains(&index).then(|| {
                    self.list_state.select(Some(index - 1));
                    index - 1
                })
            }
            _ => None,
        }
    }
}

pub struct Menu<'a> {
    pub items: Vec<&'static str>,
    pub state: &'a mut MenuState,
    /// Dims the menu while a call is in flight
    pub disabled: bool,
}

impl<'a> Component for Menu<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let base = if self.disabled {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };
        let items: Vec<ListItem> = self
            .items
            .iter()
            .enumerate()
            .map(|(i, label)| ListItem::new(Line::from(format!("{}. {}", i + 1, label))))
            .collect();
        let list = List::new(items)
            .style(base)
            .highlight_symbol("▶ ")
            .highlight_style(
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_stateful_widget(list, area, &mut self.state.list_state);
    }
}
