use crate::core::state::{App, Screen};
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{
    ChatView, ConfirmOverlay, Dashboard, HistoryView, LoginView, NoticeOverlay,
    QuestionnaireView, ResultView, SessionPicker, TitleBar,
};
use crate::tui::keymap;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;

const END_CHAT_QUESTION: &str = "End this conversation?";

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Min(0), Length(1)]);
    let [title_area, main_area, hint_area] = layout.areas(frame.area());

    TitleBar::new(
        app.screen.title().to_string(),
        app.username().map(str::to_string),
        app.status_message.clone(),
        app.is_loading,
    )
    .render(frame, title_area);

    draw_screen(frame, main_area, app, tui, spinner_frame);

    frame.render_widget(
        Paragraph::new(Line::styled(
            keymap::hints(app, tui),
            Style::default().fg(Color::DarkGray),
        )),
        hint_area,
    );

    if tui.confirm_end_chat {
        ConfirmOverlay {
            question: END_CHAT_QUESTION,
        }
        .render(frame, main_area);
    }
    if let Some(notice) = &app.notice {
        NoticeOverlay { notice }.render(frame, main_area);
    }
}

fn draw_screen(frame: &mut Frame, area: Rect, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    match app.screen {
        Screen::Login => LoginView {
            form: &app.login,
            input: &mut tui.username_input,
        }
        .render(frame, area),
        Screen::Dashboard => Dashboard {
            username: app.username().unwrap_or_default(),
            latest: &app.latest_mood,
            menu: &mut tui.dashboard_menu,
            is_loading: app.is_loading,
        }
        .render(frame, area),
        Screen::Questionnaire => QuestionnaireView {
            wizard: &app.wizard,
            state: &mut tui.questionnaire,
        }
        .render(frame, area),
        Screen::Result => match &app.verdict {
            Some(verdict) => ResultView {
                verdict,
                menu: &mut tui.result_menu,
                is_loading: app.is_loading,
            }
            .render(frame, area),
            None => draw_placeholder(frame, area, "No assessment result yet."),
        },
        Screen::History => HistoryView {
            history: &app.history,
            state: &mut tui.history,
        }
        .render(frame, area),
        Screen::Sessions => SessionPicker {
            sessions: &app.sessions,
            state: &mut tui.session_picker,
            is_loading: app.is_loading,
        }
        .render(frame, area),
        Screen::Chat => match &app.chat {
            Some(chat) => ChatView {
                chat,
                messages: &mut tui.message_list,
                composer: &mut tui.chat_input,
                spinner_frame,
            }
            .render(frame, area),
            None => draw_placeholder(frame, area, "No conversation open."),
        },
    }
}

fn draw_placeholder(frame: &mut Frame, area: Rect, text: &str) {
    frame.render_widget(
        Paragraph::new(Line::styled(text, Style::default().fg(Color::DarkGray)))
            .alignment(Alignment::Center),
        area,
    );
}
