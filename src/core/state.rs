//! # Application State
//!
//! Core business state for Mira. Domain state only - presentation state
//! (input buffers, scroll offsets, list cursors) lives in the `tui` module.
//!
//! ```text
//! App
//! ├── screen: Screen                        // what is on screen
//! ├── return_screen: Screen                 // where History goes back to
//! ├── identity: Identity                    // active username (gates everything)
//! ├── login: LoginForm                      // check-user / signup / login flow
//! ├── latest_mood: Fetch<Option<Entry>>     // dashboard summary
//! ├── wizard: Questionnaire                 // current question + answers
//! ├── verdict: Option<MoodVerdict>          // last detect-mood result
//! ├── history: Fetch<Vec<Entry>>            // mood history view
//! ├── sessions: Fetch<Vec<Summary>>         // past chat sessions
//! ├── chat: Option<ChatSession>             // open conversation
//! ├── notice: Option<Notice>                // blocking message, Enter dismisses
//! ├── status_message: String                // title bar text
//! ├── backend_label: String                 // base URL shown in the title bar
//! ├── is_loading: bool                      // a screen-blocking call is in flight
//! └── remember_user: bool                   // mirror identity to the cache file
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use crate::api::{ChatSessionSummary, MoodHistoryEntry, MoodVerdict};
use crate::core::chat::ChatSession;
use crate::core::config::ResolvedConfig;
use crate::core::identity::{Identity, LoginForm};
use crate::core::questionnaire::Questionnaire;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Dashboard,
    Questionnaire,
    Result,
    History,
    Sessions,
    Chat,
}

impl Screen {
    pub fn title(self) -> &'static str {
        match self {
            Screen::Login => "Welcome",
            Screen::Dashboard => "Dashboard",
            Screen::Questionnaire => "Mood Check-in",
            Screen::Result => "Your Mood",
            Screen::History => "Mood History",
            Screen::Sessions => "Past Conversations",
            Screen::Chat => "Chat",
        }
    }
}

/// A backend-fed view: not requested yet, in flight, arrived, or failed
/// with a user-facing message.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Fetch<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> Fetch<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Fetch::Loading)
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            Fetch::Loaded(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub tone: Tone,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Info,
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Success,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Error,
        }
    }
}

pub struct App {
    pub screen: Screen,
    pub return_screen: Screen,
    pub identity: Identity,
    pub login: LoginForm,
    pub latest_mood: Fetch<Option<MoodHistoryEntry>>,
    pub wizard: Questionnaire,
    pub verdict: Option<MoodVerdict>,
    pub history: Fetch<Vec<MoodHistoryEntry>>,
    pub sessions: Fetch<Vec<ChatSessionSummary>>,
    pub chat: Option<ChatSession>,
    pub notice: Option<Notice>,
    pub status_message: String,
    pub backend_label: String,
    pub is_loading: bool,
    pub remember_user: bool,
}

impl App {
    pub fn new(backend_label: String) -> Self {
        Self {
            screen: Screen::Login,
            return_screen: Screen::Dashboard,
            identity: Identity::default(),
            login: LoginForm::default(),
            latest_mood: Fetch::Idle,
            wizard: Questionnaire::new(),
            verdict: None,
            history: Fetch::Idle,
            sessions: Fetch::Idle,
            chat: None,
            notice: None,
            status_message: String::from("Welcome to Mira!"),
            backend_label,
            is_loading: false,
            remember_user: true,
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        let mut app = Self::new(config.base_url.clone());
        app.remember_user = config.remember_user;
        app
    }

    pub fn username(&self) -> Option<&str> {
        self.identity.username()
    }

    /// Drops every piece of per-user state.
    pub fn clear_user_state(&mut self) {
        self.identity.clear();
        self.login.reset();
        self.latest_mood = Fetch::Idle;
        self.wizard.reset();
        self.verdict = None;
        self.history = Fetch::Idle;
        self.sessions = Fetch::Idle;
        self.chat = None;
        self.notice = None;
        self.is_loading = false;
        self.screen = Screen::Login;
        self.return_screen = Screen::Dashboard;
    }
}
