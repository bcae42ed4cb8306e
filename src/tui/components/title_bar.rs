//! # TitleBar Component
//!
//! Top status bar: application name, current screen, signed-in user and the
//! status line.
//!
//! ```text
//! Mira | Mood History | alice | Connected to http://localhost:8000
//! ```
//!
//! Purely presentational. All four props come from core `App` state and the
//! bar renders whatever it is given, so it is trivial to test against a
//! `TestBackend`. Empty props are skipped rather than leaving a dangling
//! separator.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

pub struct TitleBar {
    pub screen_title: String,
    /// Signed-in username, if any
    pub username: Option<String>,
    pub status_message: String,
    /// A screen-blocking call is in flight
    pub is_loading: bool,
}

impl TitleBar {
    pub fn new(
        screen_title: String,
        username: Option<String>,
        status_message: String,
        is_loading: bool,
    ) -> Self {
        Self {
            screen_title,
            username,
            status_message,
            is_loading,
        }
    }

    fn segments(&self) -> Vec<String> {
        let mut parts = vec![self.screen_title.clone()];
        if let Some(user) = &self.username {
            parts.push(user.clone());
        }
        if self.is_loading {
            parts.push("Loading...".to_string());
        } else if !self.status_message.is_empty() {
            parts.push(self.status_message.clone());
        }
        parts.retain(|p| !p.is_empty());
        parts
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::styled(
            "Mira",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )];
        for part in self.segments() {
            spans.push(Span::styled(" | ", Style::default().fg(Color::DarkGray)));
            spans.push(Span::raw(part));
        }
        frame.render_widget(Line::from(spans), area);
    }
}
