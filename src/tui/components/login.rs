//! Login / signup screen: one username field with an inline message below it.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;

use crate::core::identity::{LoginForm, LoginStage};
use crate::tui::component::Component;
use crate::tui::components::input_box::InputBox;
use crate::tui::components::notice::{centered_rect, tone_color};

const PANEL_WIDTH: u16 = 56;
const PANEL_HEIGHT: u16 = 10;

pub struct LoginView<'a> {
    pub form: &'a LoginForm,
    pub input: &'a mut InputBox,
}

impl<'a> LoginView<'a> {
    fn status_line(&self) -> Line<'static> {
        if let Some(message) = &self.form.message {
            return Line::styled(message.text.clone(), Style::default().fg(tone_color(message.tone)));
        }
        let dim = Style::default().fg(Color::DarkGray);
        match &self.form.stage {
            LoginStage::Checking { .. } => Line::styled("Checking username...", dim),
            LoginStage::Submitting { .. } => Line::styled("Signing you in...", dim),
            LoginStage::EnterName | LoginStage::Confirm { .. } => Line::default(),
        }
    }
}

impl<'a> Component for LoginView<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let panel = centered_rect(PANEL_WIDTH, PANEL_HEIGHT, area);
        let [heading, tagline, _, input_area, _, status] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .areas(panel);

        frame.render_widget(
            Paragraph::new(Line::styled(
                "Welcome to Mira",
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center),
            heading,
        );
        frame.render_widget(
            Paragraph::new(Line::styled(
                "Your companion for mood tracking",
                Style::default().fg(Color::DarkGray),
            ))
            .alignment(Alignment::Center),
            tagline,
        );

        self.input.render(frame, input_area);

        frame.render_widget(
            Paragraph::new(self.status_line()).alignment(Alignment::Center),
            status,
        );
    }
}
