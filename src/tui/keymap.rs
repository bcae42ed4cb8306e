//! Translates terminal events into core actions for the current screen.
//!
//! Overlays take precedence: while a notice is up only Enter/Esc do
//! anything, and while the end-chat prompt is up only y/n/Enter/Esc do.

use crate::core::action::Action;
use crate::core::state::{App, Screen};
use crate::tui::TuiState;
use crate::tui::component::EventHandler;
use crate::tui::components::{
    DashboardItem, InputEvent, QuestionnaireEvent, ResultItem, SessionPickerEvent,
};
use crate::tui::event::TuiEvent;

pub fn route(app: &App, tui: &mut TuiState, event: &TuiEvent) -> Option<Action> {
    if matches!(event, TuiEvent::ForceQuit) {
        return Some(Action::Quit);
    }

    if app.notice.is_some() {
        return match event {
            TuiEvent::Submit | TuiEvent::Escape => Some(Action::DismissNotice),
            _ => None,
        };
    }

    if tui.confirm_end_chat {
        return match event {
            TuiEvent::Submit | TuiEvent::InputChar('y' | 'Y') => {
                tui.confirm_end_chat = false;
                Some(Action::EndChat)
            }
            TuiEvent::Escape | TuiEvent::InputChar('n' | 'N') => {
                tui.confirm_end_chat = false;
                None
            }
            _ => None,
        };
    }

    match app.screen {
        Screen::Login => login(tui, event),
        Screen::Dashboard => dashboard(tui, event),
        Screen::Questionnaire => questionnaire(app, tui, event),
        Screen::Result => result(tui, event),
        Screen::History => match event {
            TuiEvent::Escape => Some(Action::Back),
            TuiEvent::InputChar('r') => Some(Action::OpenHistory),
            _ => {
                tui.history.handle_event(event);
                None
            }
        },
        Screen::Sessions => sessions(app, tui, event),
        Screen::Chat => chat(tui, event),
    }
}

fn login(tui: &mut TuiState, event: &TuiEvent) -> Option<Action> {
    if matches!(event, TuiEvent::Escape) {
        return Some(Action::Quit);
    }
    match tui.username_input.handle_event(event)? {
        InputEvent::Submit(text) => Some(Action::SubmitUsername(text)),
        InputEvent::Changed => Some(Action::UsernameEdited),
        InputEvent::Moved => None,
    }
}

fn dashboard(tui: &mut TuiState, event: &TuiEvent) -> Option<Action> {
    if matches!(event, TuiEvent::InputChar('q')) {
        return Some(Action::Quit);
    }
    let item = DashboardItem::from_index(tui.dashboard_menu.handle_event(event)?)?;
    Some(match item {
        DashboardItem::TakeAssessment => Action::StartQuestionnaire,
        DashboardItem::ViewHistory => Action::OpenHistory,
        DashboardItem::PastConversations => Action::OpenSessions,
        DashboardItem::Logout => Action::Logout,
    })
}

fn questionnaire(app: &App, tui: &mut TuiState, event: &TuiEvent) -> Option<Action> {
    if matches!(event, TuiEvent::Escape) {
        return Some(Action::Back);
    }
    // Several keys can arrive in one batch; the wizard may have moved since the last frame
    tui.questionnaire.sync(&app.wizard);
    Some(match tui.questionnaire.handle_event(event)? {
        QuestionnaireEvent::Select(code) => Action::SelectOption(code),
        QuestionnaireEvent::Advance if app.wizard.is_last() => Action::SubmitAnswers,
        QuestionnaireEvent::Advance => Action::NextQuestion,
        QuestionnaireEvent::Retreat => Action::PreviousQuestion,
    })
}

fn result(tui: &mut TuiState, event: &TuiEvent) -> Option<Action> {
    if matches!(event, TuiEvent::Escape) {
        return Some(Action::Back);
    }
    let item = ResultItem::from_index(tui.result_menu.handle_event(event)?)?;
    Some(match item {
        ResultItem::TalkToMira => Action::StartChat,
        ResultItem::ViewHistory => Action::OpenHistory,
        ResultItem::Retake => Action::StartQuestionnaire,
        ResultItem::BackToDashboard => Action::Back,
    })
}

fn sessions(app: &App, tui: &mut TuiState, event: &TuiEvent) -> Option<Action> {
    match tui.session_picker.handle_event(event)? {
        SessionPickerEvent::Resume(index) => app
            .sessions
            .loaded()
            .and_then(|sessions| sessions.get(index))
            .cloned()
            .map(Action::ResumeSession),
        SessionPickerEvent::Refresh => Some(Action::OpenSessions),
        SessionPickerEvent::Dismiss => Some(Action::Back),
    }
}

fn chat(tui: &mut TuiState, event: &TuiEvent) -> Option<Action> {
    match event {
        TuiEvent::Escape => {
            tui.confirm_end_chat = true;
            None
        }
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown => {
            tui.message_list.handle_event(event);
            None
        }
        _ => match tui.chat_input.handle_event(event)? {
            InputEvent::Submit(text) => Some(Action::SendMessage(text)),
            InputEvent::Changed | InputEvent::Moved => None,
        },
    }
}

/// Key hints for the bottom bar.
pub fn hints(app: &App, tui: &TuiState) -> &'static str {
    if app.notice.is_some() {
        return "Enter: continue";
    }
    if tui.confirm_end_chat {
        return "y: end conversation   n: keep talking";
    }
    match app.screen {
        Screen::Login => "Enter: continue   Esc: quit",
        Screen::Dashboard => "↑/↓: move   Enter: select   1-4: shortcut   q: quit",
        Screen::Questionnaire => {
            "↑/↓: move   Space or letter: answer   Enter: next   ←: previous   Esc: dashboard"
        }
        Screen::Result => "↑/↓: move   Enter: select   Esc: dashboard",
        Screen::History => "↑/↓: scroll   r: refresh   Esc: back",
        Screen::Sessions => "↑/↓: move   Enter: open   r: refresh   Esc: back",
        Screen::Chat => "Enter: send   Ctrl+J: newline   PgUp/PgDn: scroll   Esc: end chat",
    }
}
