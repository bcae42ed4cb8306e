//! Dashboard: greeting, latest mood summary and the main menu.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};

use crate::api::MoodHistoryEntry;
use crate::core::history::format_timestamp;
use crate::core::state::Fetch;
use crate::tui::component::Component;
use crate::tui::components::menu::{Menu, MenuState};
use crate::tui::components::mood_badge::badge;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardItem {
    TakeAssessment,
    ViewHistory,
    PastConversations,
    Logout,
}

impl DashboardItem {
    pub const ALL: [DashboardItem; 4] = [
        DashboardItem::TakeAssessment,
        DashboardItem::ViewHistory,
        DashboardItem::PastConversations,
        DashboardItem::Logout,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DashboardItem::TakeAssessment => "Take mood assessment",
            DashboardItem::ViewHistory => "View mood history",
            DashboardItem::PastConversations => "Past conversations",
            DashboardItem::Logout => "Log out",
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

pub struct Dashboard<'a> {
    pub username: &'a str,
    pub latest: &'a Fetch<Option<MoodHistoryEntry>>,
    pub menu: &'a mut MenuState,
    pub is_loading: bool,
}

fn latest_mood_lines(latest: &Fetch<Option<MoodHistoryEntry>>) -> Vec<Line<'static>> {
    let dim = Style::default().fg(Color::DarkGray);
    match latest {
        Fetch::Idle | Fetch::Loading => vec![Line::styled("Loading your latest mood...", dim)],
        Fetch::Loaded(None) => vec![Line::styled(
            "No assessments yet. Take your first one below!",
            dim,
        )],
        Fetch::Loaded(Some(entry)) => {
            let mut spans = vec![Span::raw("Latest mood: ")];
            spans.extend(badge(&entry.mood));
            vec![
                Line::from(spans),
                Line::styled(format!("Recorded {}", format_timestamp(&entry.created_at)), dim),
            ]
        }
        Fetch::Failed(message) => vec![Line::styled(
            format!("Could not load your latest mood: {message}"),
            Style::default().fg(Color::Red),
        )],
    }
}

impl<'a> Component for Dashboard<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray))
            .padding(Padding::new(2, 2, 1, 1));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [greeting, summary, _, menu_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(inner);

        frame.render_widget(
            Paragraph::new(Line::styled(
                format!("Hello, {}!", self.username),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            greeting,
        );
        frame.render_widget(Paragraph::new(latest_mood_lines(self.latest)), summary);

        Menu {
            items: DashboardItem::ALL.iter().map(|i| i.label()).collect(),
            state: self.menu,
            disabled: self.is_loading,
        }
        .render(frame, menu_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render(latest: &Fetch<Option<MoodHistoryEntry>>) -> String {
        let backend = TestBackend::new(70, 14);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut menu = MenuState::new(DashboardItem::ALL.len());
        terminal
            .draw(|f| {
                Dashboard {
                    username: "alice",
                    latest,
                    menu: &mut menu,
                    is_loading: false,
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
    fn test_menu_items_map_by_index() {
        assert_eq!(DashboardItem::from_index(0), Some(DashboardItem::TakeAssessment));
        assert_eq!(DashboardItem::from_index(3), Some(DashboardItem::Logout));
        assert_eq!(DashboardItem::from_index(4), None);
    }

    #[test]
    fn test_greets_user_and_lists_menu() {
        let text = render(&Fetch::Loading);
        assert!(text.contains("Hello, alice!"));
        assert!(text.contains("Loading your latest mood..."));
        assert!(text.contains("1. Take mood assessment"));
        assert!(text.contains("4. Log out"));
    }

    #[test]
    fn test_latest_mood_summary() {
        let entry = MoodHistoryEntry {
            id: None,
            mood: "Stressed".to_string(),
            created_at: "2024-01-15 10:30:00".to_string(),
            answers: None,
        };
        let text = render(&Fetch::Loaded(Some(entry)));
        assert!(text.contains("Stressed"));
        assert!(text.contains("Recorded Jan 15, 2024, 10:30 AM"));
    }

    #[test]
    fn test_no_history_yet() {
        let text = render(&Fetch::Loaded(None));
        assert!(text.contains("No assessments yet"));
    }
}
