//! Chat screen: mood header, scrollable transcript, and the composer.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::core::chat::ChatSession;
use crate::tui::component::Component;
use crate::tui::components::input_box::InputBox;
use crate::tui::components::message_list::{MessageList, MessageListState};
use crate::tui::components::mood_badge::badge;

pub struct ChatView<'a> {
    pub chat: &'a ChatSession,
    pub messages: &'a mut MessageListState,
    pub composer: &'a mut InputBox,
    pub spinner_frame: usize,
}

impl<'a> ChatView<'a> {
    fn header(&self) -> Line<'static> {
        let mut spans = vec![Span::styled(
            "Talking about feeling ",
            Style::default().fg(Color::DarkGray),
        )];
        spans.extend(badge(&self.chat.mood));
        Line::from(spans)
    }
}

impl<'a> Component for ChatView<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let composer_height = self.composer.calculate_height(area.width);
        let [header, transcript, composer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(composer_height),
        ])
        .areas(area);

        frame.render_widget(Paragraph::new(self.header()), header);

        MessageList::new(
            self.messages,
            &self.chat.transcript,
            self.chat.pending,
            self.spinner_frame,
        )
        .render(frame, transcript);

        self.composer.render(frame, composer);
    }
}
