//! Mood history timeline, in the order the backend delivered it.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Cell, Padding, Paragraph, Row, Table, TableState};

use crate::api::MoodHistoryEntry;
use crate::core::history::{EMPTY_HISTORY_MESSAGE, HistoryRow, rows};
use crate::core::state::Fetch;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::mood_badge::class_color;
use crate::tui::event::TuiEvent;

/// Scroll position of the history table.
#[derive(Default)]
pub struct HistoryState {
    pub table_state: TableState,
    len: usize,
}

impl HistoryState {
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        match (len, self.table_state.selected()) {
            (0, _) => self.table_state.select(None),
            (_, None) => self.table_state.select(Some(0)),
            (_, Some(i)) if i >= len => self.table_state.select(Some(len - 1)),
            _ => {}
        }
    }

    pub fn reset(&mut self) {
        self.table_state = TableState::default();
        self.set_len(self.len);
    }
}

impl EventHandler for HistoryState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if self.len == 0 {
            return None;
        }
        let current = self.table_state.selected().unwrap_or(0);
        let next = match event {
            TuiEvent::CursorUp | TuiEvent::ScrollUp => current.saturating_sub(1),
            TuiEvent::CursorDown | TuiEvent::ScrollDown => current + 1,
            TuiEvent::ScrollPageUp => current.saturating_sub(10),
            TuiEvent::ScrollPageDown => current + 10,
            TuiEvent::Home => 0,
            TuiEvent::End => self.len - 1,
            _ => return None,
        };
        self.table_state.select(Some(next.min(self.len - 1)));
        None
    }
}

pub struct HistoryView<'a> {
    pub history: &'a Fetch<Vec<MoodHistoryEntry>>,
    pub state: &'a mut HistoryState,
}

fn table_row(row: &HistoryRow) -> Row<'static> {
    Row::new(vec![
        Cell::from(row.icon),
        Cell::from(Span::styled(
            row.mood.clone(),
            Style::default()
                .fg(class_color(row.class))
                .add_modifier(Modifier::BOLD),
        )),
        Cell::from(Span::styled(row.date.clone(), Style::default().fg(Color::Gray))),
    ])
}

fn centered_message(frame: &mut Frame, area: Rect, text: String, style: Style) {
    frame.render_widget(
        Paragraph::new(Line::styled(text, style)).alignment(Alignment::Center),
        area,
    );
}

impl<'a> Component for HistoryView<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Mood History ")
            .padding(Padding::new(2, 2, 1, 0));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [header, _, body] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(inner);

        let dim = Style::default().fg(Color::DarkGray);
        let entries = match self.history {
            Fetch::Idle | Fetch::Loading => {
                centered_message(frame, body, "Loading history...".to_string(), dim);
                return;
            }
            Fetch::Failed(message) => {
                centered_message(
                    frame,
                    body,
                    format!("Error loading history: {message}"),
                    Style::default().fg(Color::Red),
                );
                return;
            }
            Fetch::Loaded(entries) => entries,
        };

        frame.render_widget(
            Paragraph::new(Line::styled(format!("{} total entries", entries.len()), dim)),
            header,
        );

        if entries.is_empty() {
            centered_message(frame, body, EMPTY_HISTORY_MESSAGE.to_string(), dim);
            return;
        }

        self.state.set_len(entries.len());
        let table = Table::new(
            rows(entries).iter().map(table_row),
            [
                Constraint::Length(3),
                Constraint::Fill(1),
                Constraint::Length(26),
            ],
        )
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        frame.render_stateful_widget(table, body, &mut self.state.table_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn entry(mood: &str, created_at: &str) -> MoodHistoryEntry {
        MoodHistoryEntry {
            id: None,
            mood: mood.to_string(),
            created_at: created_at.to_string(),
            answers: None,
        }
    }

    fn render(history: &Fetch<Vec<MoodHistoryEntry>>, state: &mut HistoryState) -> String {
        let backend = TestBackend::new(80, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| HistoryView { history, state }.render(f, f.area()))
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
    fn test_loading_and_failed_states_are_distinct() {
        let mut state = HistoryState::default();
        assert!(render(&Fetch::Loading, &mut state).contains("Loading history..."));

        let text = render(
            &Fetch::Failed("Error connecting to server. Please try again.".to_string()),
            &mut state,
        );
        assert!(text.contains("Error loading history: Error connecting to server."));
    }

    #[test]
    fn test_empty_history_message() {
        let mut state = HistoryState::default();
        let text = render(&Fetch::Loaded(Vec::new()), &mut state);
        assert!(text.contains("0 total entries"));
        assert!(text.contains(EMPTY_HISTORY_MESSAGE));
    }

    #[test]
    fn test_rows_keep_backend_order() {
        let mut state = HistoryState::default();
        let history = Fetch::Loaded(vec![
            entry("Stressed", "2024-01-16 09:00:00"),
            entry("Happy/Calm", "2024-01-15 10:30:00"),
        ]);
        let text = render(&history, &mut state);
        assert!(text.contains("2 total entries"));
        let stressed = text.find("Stressed").unwrap();
        let happy = text.find("Happy/Calm").unwrap();
        assert!(stressed < happy);
        assert!(text.contains("Jan 15, 2024, 10:30 AM"));
    }

    #[test]
    fn test_selection_is_clamped() {
        let mut state = HistoryState::default();
        state.set_len(3);
        state.handle_event(&TuiEvent::ScrollPageDown);
        assert_eq!(state.table_state.selected(), Some(2));
        state.handle_event(&TuiEvent::Home);
        assert_eq!(state.table_state.selected(), Some(0));
        state.set_len(0);
        assert_eq!(state.table_state.selected(), None);
    }
}
