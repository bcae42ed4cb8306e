//! Result screen: the detected mood, its description and what to do next.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Wrap};

use crate::api::MoodVerdict;
use crate::core::mood::descriptor;
use crate::tui::component::Component;
use crate::tui::components::menu::{Menu, MenuState};
use crate::tui::components::mood_badge::{badge, class_color};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultItem {
    TalkToMira,
    ViewHistory,
    Retake,
    BackToDashboard,
}

impl ResultItem {
    pub const ALL: [ResultItem; 4] = [
        ResultItem::TalkToMira,
        ResultItem::ViewHistory,
        ResultItem::Retake,
        ResultItem::BackToDashboard,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ResultItem::TalkToMira => "Talk to Mira",
            ResultItem::ViewHistory => "View mood history",
            ResultItem::Retake => "Retake assessment",
            ResultItem::BackToDashboard => "Back to dashboard",
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

pub struct ResultView<'a> {
    pub verdict: &'a MoodVerdict,
    pub menu: &'a mut MenuState,
    /// Chat start in flight
    pub is_loading: bool,
}

impl<'a> Component for ResultView<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let d = descriptor(&self.verdict.mood);
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(class_color(d.class)))
            .title(" Your mood today ")
            .padding(Padding::new(2, 2, 1, 1));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [label, description, status, menu_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .areas(inner);

        frame.render_widget(
            Paragraph::new(Line::from(badge(&self.verdict.mood))).alignment(Alignment::Center),
            label,
        );
        frame.render_widget(
            Paragraph::new(d.description)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            description,
        );
        if self.is_loading {
            frame.render_widget(
                Paragraph::new(Line::styled(
                    "Starting your conversation...",
                    Style::default().fg(Color::DarkGray),
                ))
                .alignment(Alignment::Center),
                status,
            );
        }

        Menu {
            items: ResultItem::ALL.iter().map(|i| i.label()).collect(),
            state: self.menu,
            disabled: self.is_loading,
        }
        .render(frame, menu_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::OpaqueId;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render(mood: &str, is_loading: bool) -> String {
        let verdict = MoodVerdict {
            mood: mood.to_string(),
            log_id: OpaqueId::Number(42),
        };
        let backend = TestBackend::new(110, 16);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut menu = MenuState::new(ResultItem::ALL.len());
        terminal
            .draw(|f| {
                ResultView {
                    verdict: &verdict,
                    menu: &mut menu,
                    is_loading,
                }
                .render(f, f.area())
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_known_label_shows_its_description() {
        let text = render("Happy/Calm", false);
        assert!(text.contains("Happy/Calm"));
        assert!(text.contains("You're feeling positive and at peace."));
        assert!(text.contains("1. Talk to Mira"));
    }

    #[test]
    fn test_unknown_label_is_verbatim_with_neutral_description() {
        let text = render("Anxious", false);
        assert!(text.contains("Anxious"));
        assert!(text.contains("You're in a balanced state."));
    }

    #[test]
    fn test_loading_shows_progress() {
        let text = render("Stressed", true);
        assert!(text.contains("Starting your conversation..."));
    }
}
