//! # Questionnaire Component
//!
//! One question at a time: progress gauge, prompt, and the option list.
//!
//! `QuestionnaireState` keeps the highlighted row. It is re-synced with the
//! wizard every frame; when the question changes the highlight jumps to the
//! recorded answer (or the first option). Selecting is explicit (Space or the
//! option letter) so moving the highlight never records an answer.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap};

use crate::core::questionnaire::{Questionnaire, TOTAL_QUESTIONS, WizardStatus, question};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// What the user asked the wizard to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionnaireEvent {
    Select(char),
    /// Enter: next question, or submit on the last one
    Advance,
    Retreat,
}

#[derive(Debug, Default)]
pub struct QuestionnaireState {
    question_id: usize,
    pub cursor: usize,
}

impl QuestionnaireState {
    pub fn sync(&mut self, wizard: &Questionnaire) {
        if wizard.current == self.question_id {
            return;
        }
        self.question_id = wizard.current;
        let q = wizard.current_question();
        self.cursor = wizard
            .selected()
            .and_then(|code| q.options.iter().position(|o| o.code == code))
            .unwrap_or(0);
    }

    fn option_count(&self) -> usize {
        question(self.question_id).map_or(0, |q| q.options.len())
    }
}

impl EventHandler for QuestionnaireState {
    type Event = QuestionnaireEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        let q = question(self.question_id)?;
        match event {
            TuiEvent::CursorUp => {
                self.cursor = self.cursor.saturating_sub(1);
                None
            }
            TuiEvent::CursorDown => {
                self.cursor = (self.cursor + 1).min(self.option_count().saturating_sub(1));
                None
            }
            TuiEvent::InputChar(' ') => q
                .options
                .get(self.cursor)
                .map(|o| QuestionnaireEvent::Select(o.code)),
            TuiEvent::InputChar(c) if c.is_ascii_alphabetic() => {
                let code = c.to_ascii_uppercase();
                if let Some(index) = q.options.iter().position(|o| o.code == code) {
                    self.cursor = index;
                }
                Some(QuestionnaireEvent::Select(code))
            }
            TuiEvent::Submit => Some(QuestionnaireEvent::Advance),
            TuiEvent::CursorLeft | TuiEvent::Backspace => Some(QuestionnaireEvent::Retreat),
            _ => None,
        }
    }
}

pub struct QuestionnaireView<'a> {
    pub wizard: &'a Questionnaire,
    pub state: &'a mut QuestionnaireState,
}

impl<'a> Component for QuestionnaireView<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.state.sync(self.wizard);
        let q = self.wizard.current_question();
        let selected = self.wizard.selected();
        let submitting = self.wizard.status == WizardStatus::Submitting;

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray))
            .padding(Padding::new(2, 2, 1, 1));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [gauge_area, _, prompt_area, options_area, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(inner);

        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(Color::Magenta).bg(Color::Black))
            .percent(self.wizard.progress_percent())
            .label(format!("Question {} of {}", q.id, TOTAL_QUESTIONS));
        frame.render_widget(gauge, gauge_area);

        frame.render_widget(
            Paragraph::new(Line::styled(
                q.prompt,
                Style::default().add_modifier(Modifier::BOLD),
            ))
            .wrap(Wrap { trim: true }),
            prompt_area,
        );

        let items: Vec<ListItem> = q
            .options
            .iter()
            .map(|o| {
                let chosen = selected == Some(o.code);
                let mark = if chosen { "(•)" } else { "( )" };
                let style = if chosen {
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{mark} "), style),
                    Span::styled(format!("{}. {}", o.code, o.text), style),
                ]))
            })
            .collect();
        let mut list_state = ListState::default().with_selected(Some(self.state.cursor));
        frame.render_stateful_widget(
            List::new(items)
                .highlight_symbol("▶ ")
                .highlight_style(Style::default().add_modifier(Modifier::REVERSED)),
            options_area,
            &mut list_state,
        );

        let footer_text = if submitting {
            Line::styled(
                "Analyzing your mood...",
                Style::default().fg(Color::Magenta).add_modifier(Modifier::ITALIC),
            )
        } else if self.wizard.is_last() {
            Line::styled("Enter to submit", Style::default().fg(Color::DarkGray))
        } else {
            Line::styled("Enter for the next question", Style::default().fg(Color::DarkGray))
        };
        frame.render_widget(Paragraph::new(footer_text), footer);
    }
}
