//! # Actions
//!
//! Everything that can happen in Mira becomes an `Action`.
//! User presses Enter on the login screen? That's `Action::SubmitUsername`.
//! The backend answers? That's `Action::UserChecked { .. }`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state and returns an [`Effect`] describing the I/O the adapter should
//! perform. No side effects here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! Backend completions are ignored once the user has logged out, and when
//! the view that asked for them is no longer waiting.

use log::{debug, info, warn};

use crate::api::{
    AccountResponse, ApiError, ChatMessage, ChatReply, ChatSessionSummary, ChatStart,
    MoodHistoryEntry, MoodVerdict, OpaqueId, UserCheck,
};
use crate::core::chat::{ChatOrigin, ChatSession};
use crate::core::identity::{LoginStage, confirm_prompt, normalize_username};
use crate::core::questionnaire::{AnswerSet, WizardStatus};
use crate::core::state::{App, Fetch, Notice, Screen};
use crate::core::validation::ValidationError;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // Identity
    /// The login input changed.
    UsernameEdited,
    /// Enter on the login screen: look the name up, or confirm after a lookup.
    SubmitUsername(String),
    UserChecked {
        username: String,
        result: Result<UserCheck, ApiError>,
    },
    AccountResolved {
        username: String,
        check: UserCheck,
        result: Result<AccountResponse, ApiError>,
    },
    /// Username found in the cache at start-up.
    RestoreIdentity(String),
    Logout,

    // Dashboard
    LatestMoodLoaded(Result<Vec<MoodHistoryEntry>, ApiError>),

    // Questionnaire
    StartQuestionnaire,
    SelectOption(char),
    NextQuestion,
    PreviousQuestion,
    SubmitAnswers,
    MoodDetected(Result<MoodVerdict, ApiError>),

    // History
    OpenHistory,
    HistoryLoaded(Result<Vec<MoodHistoryEntry>, ApiError>),

    // Chat
    StartChat,
    ChatStarted(Result<ChatStart, ApiError>),
    SendMessage(String),
    ReplyReceived {
        session_id: OpaqueId,
        result: Result<ChatReply, ApiError>,
    },
    /// Confirmed end of the open chat.
    EndChat,
    ChatEnded {
        session_id: OpaqueId,
        result: Result<(), ApiError>,
    },

    // Past sessions
    OpenSessions,
    SessionsLoaded(Result<Vec<ChatSessionSummary>, ApiError>),
    ResumeSession(ChatSessionSummary),
    SessionResumed {
        summary: ChatSessionSummary,
        result: Result<Vec<ChatMessage>, ApiError>,
    },

    // Misc
    Back,
    DismissNotice,
    BackendProbed(Result<(), ApiError>),
    Quit,
}

/// Backend calls the adapter should run. Each one completes with exactly
/// one `Action` (see `api::dispatch`).
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    CheckUser(String),
    Signup(String),
    Login(String),
    DetectMood {
        username: String,
        answers: AnswerSet,
    },
    /// Mood history fetched for the dashboard summary.
    LatestMood(String),
    MoodHistory(String),
    StartChat {
        username: String,
        mood_log_id: OpaqueId,
    },
    SendMessage {
        session_id: OpaqueId,
        message: String,
    },
    EndChat(OpaqueId),
    ChatHistory(ChatSessionSummary),
    ChatSessions(String),
    Health,
}

/// Side effects requested by `update()`.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Quit,
    Request(Request),
    /// Write the username cache.
    PersistIdentity(String),
    /// Delete the username cache.
    ForgetIdentity,
    Batch(Vec<Effect>),
}

impl Effect {
    /// Flattens nested batches into a plain list, dropping `None`.
    pub fn into_list(self) -> Vec<Effect> {
        match self {
            Effect::None => Vec::new(),
            Effect::Batch(effects) => effects.into_iter().flat_map(Effect::into_list).collect(),
            other => vec![other],
        }
    }
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        // ── Identity ───────────────────────────────────────────────────
        Action::UsernameEdited => {
            if !app.login.is_busy() {
                app.login.reset();
            }
            Effect::None
        }

        Action::SubmitUsername(input) => {
            if app.identity.is_authenticated() || app.login.is_busy() {
                return Effect::None;
            }
            let username = match normalize_username(&input) {
                Ok(u) => u,
                Err(e) => {
                    app.login.reset();
                    app.login.message = Some(Notice::error(e.to_string()));
                    return Effect::None;
                }
            };

            // Second Enter on an unchanged name confirms the lookup
            if let LoginStage::Confirm {
                username: checked,
                check,
            } = &app.login.stage
                && *checked == username
            {
                let check = *check;
                app.login.stage = LoginStage::Submitting {
                    username: username.clone(),
                    check,
                };
                app.is_loading = true;
                info!("Submitting {:?} for '{}'", check, username);
                return Effect::Request(match check {
                    UserCheck::Existing => Request::Login(username),
                    UserCheck::New => Request::Signup(username),
                });
            }

            app.login.stage = LoginStage::Checking {
                username: username.clone(),
            };
            app.login.message = None;
            app.is_loading = true;
            Effect::Request(Request::CheckUser(username))
        }

        Action::UserChecked { username, result } => {
            if !matches!(&app.login.stage, LoginStage::Checking { username: u } if *u == username)
            {
                debug!("Ignoring stale check-user result for '{}'", username);
                return Effect::None;
            }
            app.is_loading = false;
            match result {
                Ok(check) => {
                    app.login.message = Some(match check {
                        UserCheck::Existing => Notice::success(confirm_prompt(&username, check)),
                        UserCheck::New => Notice::info(confirm_prompt(&username, check)),
                    });
                    app.login.stage = LoginStage::Confirm { username, check };
                }
                Err(e) => {
                    warn!("check-user failed for '{}': {}", username, e);
                    app.login.stage = LoginStage::EnterName;
                    app.login.message = Some(Notice::error(e.user_message()));
                }
            }
            Effect::None
        }

        Action::AccountResolved {
            username,
            check,
            result,
        } => {
            if !matches!(&app.login.stage, LoginStage::Submitting { username: u, .. } if *u == username)
            {
                debug!("Ignoring stale account result for '{}'", username);
                return Effect::None;
            }
            app.is_loading = false;
            match result {
                Ok(_) => log_in(app, username),
                Err(e) => {
                    warn!("{:?} account call failed for '{}': {}", check, username, e);
                    app.login.stage = LoginStage::EnterName;
                    app.login.message = Some(Notice::error(e.user_message()));
                    Effect::None
                }
            }
        }

        Action::RestoreIdentity(username) => {
            if app.identity.is_authenticated() {
                return Effect::None;
            }
            info!("Restoring cached identity '{}'", username);
            app.identity.set(username.clone());
            app.login.reset();
            enter_dashboard(app, &username)
        }

        Action::Logout => {
            let mut effects = vec![Effect::ForgetIdentity];
            if let Some(chat) = app.chat.take() {
                effects.push(Effect::Request(Request::EndChat(chat.id)));
            }
            info!("Logging out '{}'", app.username().unwrap_or_default());
            app.clear_user_state();
            app.status_message = String::from("Logged out");
            Effect::Batch(effects)
        }

        // ── Dashboard ──────────────────────────────────────────────────
        Action::LatestMoodLoaded(result) => {
            if !app.identity.is_authenticated() {
                return Effect::None;
            }
            app.latest_mood = match result {
                Ok(entries) => Fetch::Loaded(entries.into_iter().next()),
                Err(e) => {
                    warn!("Latest mood fetch failed: {}", e);
                    Fetch::Failed(e.user_message())
                }
            };
            Effect::None
        }

        // ── Questionnaire ──────────────────────────────────────────────
        Action::StartQuestionnaire => {
            if !app.identity.is_authenticated() || app.is_loading {
                return Effect::None;
            }
            app.wizard.reset();
            app.notice = None;
            app.screen = Screen::Questionnaire;
            Effect::None
        }

        Action::SelectOption(code) => {
            if app.screen != Screen::Questionnaire {
                return Effect::None;
            }
            if let Err(e) = app.wizard.select(code) {
                debug!("Selection rejected: {}", e);
            }
            Effect::None
        }

        Action::NextQuestion => {
            if app.screen != Screen::Questionnaire {
                return Effect::None;
            }
            if let Err(e) = app.wizard.next() {
                raise(app, e);
            }
            Effect::None
        }

        Action::PreviousQuestion => {
            if app.screen == Screen::Questionnaire
                && let Err(e) = app.wizard.previous()
            {
                debug!("Previous rejected: {}", e);
            }
            Effect::None
        }

        Action::SubmitAnswers => {
            let Some(username) = app.username().map(str::to_string) else {
                return Effect::None;
            };
            if app.screen != Screen::Questionnaire {
                return Effect::None;
            }
            match app.wizard.submit() {
                Ok(answers) => {
                    app.is_loading = true;
                    Effect::Request(Request::DetectMood { username, answers })
                }
                Err(ValidationError::SubmissionInFlight) => Effect::None,
                Err(e) => {
                    raise(app, e);
                    Effect::None
                }
            }
        }

        Action::MoodDetected(result) => {
            let Some(username) = app.username().map(str::to_string) else {
                return Effect::None;
            };
            if app.wizard.status != WizardStatus::Submitting {
                return Effect::None;
            }
            app.is_loading = false;
            match result {
                Ok(verdict) => {
                    info!("Mood detected: {} (log {})", verdict.mood, verdict.log_id);
                    app.wizard.complete();
                    app.verdict = Some(verdict);
                    app.screen = Screen::Result;
                    // Dashboard summary is stale now
                    app.latest_mood = Fetch::Loading;
                    Effect::Request(Request::LatestMood(username))
                }
                Err(e) => {
                    warn!("detect-mood failed: {}", e);
                    app.wizard.fail();
                    app.notice = Some(Notice::error(format!(
                        "Error analyzing mood: {}",
                        e.user_message()
                    )));
                    Effect::None
                }
            }
        }

        // ── History ────────────────────────────────────────────────────
        Action::OpenHistory => {
            let Some(username) = app.username().map(str::to_string) else {
                return Effect::None;
            };
            if app.is_loading {
                return Effect::None;
            }
            if app.screen != Screen::History {
                app.return_screen = match app.screen {
                    Screen::Result => Screen::Result,
                    _ => Screen::Dashboard,
                };
            }
            app.screen = Screen::History;
            app.history = Fetch::Loading;
            Effect::Request(Request::MoodHistory(username))
        }

        Action::HistoryLoaded(result) => {
            if !app.identity.is_authenticated() || !app.history.is_loading() {
                return Effect::None;
            }
            app.history = match result {
                Ok(entries) => {
                    debug!("History loaded: {} entries", entries.len());
                    Fetch::Loaded(entries)
                }
                Err(e) => {
                    warn!("mood-history failed: {}", e);
                    Fetch::Failed(e.user_message())
                }
            };
            Effect::None
        }

        // ── Chat ───────────────────────────────────────────────────────
        Action::StartChat => {
            let Some(username) = app.username().map(str::to_string) else {
                return Effect::None;
            };
            if app.screen != Screen::Result || app.is_loading {
                return Effect::None;
            }
            let Some(verdict) = &app.verdict else {
                return Effect::None;
            };
            app.is_loading = true;
            Effect::Request(Request::StartChat {
                username,
                mood_log_id: verdict.log_id.clone(),
            })
        }

        Action::ChatStarted(result) => {
            if !app.identity.is_authenticated() || app.screen != Screen::Result || !app.is_loading
            {
                return Effect::None;
            }
            app.is_loading = false;
            match result {
                Ok(start) => {
                    info!("Chat session {} opened", start.session_id);
                    app.chat = Some(ChatSession::start(start));
                    app.screen = Screen::Chat;
                }
                Err(e) => {
                    warn!("chat/start failed: {}", e);
                    app.notice = Some(Notice::error(format!(
                        "Error starting chat session: {}",
                        e.user_message()
                    )));
                }
            }
            Effect::None
        }

        Action::SendMessage(input) => {
            if app.screen != Screen::Chat {
                return Effect::None;
            }
            let Some(chat) = app.chat.as_mut() else {
                return Effect::None;
            };
            match chat.compose(&input) {
                Ok(message) => Effect::Request(Request::SendMessage {
                    session_id: chat.id.clone(),
                    message,
                }),
                Err(e) => {
                    debug!("Message not sent: {}", e);
                    Effect::None
                }
            }
        }

        Action::ReplyReceived { session_id, result } => {
            let Some(chat) = app.chat.as_mut() else {
                return Effect::None;
            };
            if chat.id != session_id || !chat.pending {
                debug!("Ignoring reply for inactive session {}", session_id);
                return Effect::None;
            }
            match result {
                Ok(reply) => chat.receive_reply(reply.response),
                Err(e) => {
                    warn!("chat/message failed for session {}: {}", session_id, e);
                    chat.reply_failed();
                }
            }
            Effect::None
        }

        Action::EndChat => {
            let Some(chat) = app.chat.take() else {
                return Effect::None;
            };
            app.screen = match chat.origin {
                ChatOrigin::Result if app.verdict.is_some() => Screen::Result,
                _ => Screen::Dashboard,
            };
            info!("Ending chat session {}", chat.id);
            Effect::Request(Request::EndChat(chat.id))
        }

        Action::ChatEnded { session_id, result } => {
            match result {
                Ok(()) => debug!("Session {} closed on the backend", session_id),
                Err(e) => warn!("chat/end failed for session {}: {}", session_id, e),
            }
            Effect::None
        }

        // ── Past sessions ──────────────────────────────────────────────
        Action::OpenSessions => {
            let Some(username) = app.username().map(str::to_string) else {
                return Effect::None;
            };
            if app.is_loading {
                return Effect::None;
            }
            app.screen = Screen::Sessions;
            app.sessions = Fetch::Loading;
            Effect::Request(Request::ChatSessions(username))
        }

        Action::SessionsLoaded(result) => {
            if !app.identity.is_authenticated() || !app.sessions.is_loading() {
                return Effect::None;
            }
            app.sessions = match result {
                Ok(sessions) => Fetch::Loaded(sessions),
                Err(e) => {
                    warn!("chat/sessions failed: {}", e);
                    Fetch::Failed(e.user_message())
                }
            };
            Effect::None
        }

        Action::ResumeSession(summary) => {
            if !app.identity.is_authenticated()
                || app.screen != Screen::Sessions
                || app.is_loading
            {
                return Effect::None;
            }
            app.is_loading = true;
            Effect::Request(Request::ChatHistory(summary))
        }

        Action::SessionResumed { summary, result } => {
            if !app.identity.is_authenticated()
                || app.screen != Screen::Sessions
                || !app.is_loading
            {
                return Effect::None;
            }
            app.is_loading = false;
            match result {
                Ok(transcript) => {
                    info!(
                        "Resumed session {} ({} messages)",
                        summary.id,
                        transcript.len()
                    );
                    app.chat = Some(ChatSession::resume(&summary, transcript));
                    app.screen = Screen::Chat;
                }
                Err(e) => {
                    warn!("chat/history failed for session {}: {}", summary.id, e);
                    app.notice = Some(Notice::error(format!(
                        "Error loading chat session: {}",
                        e.user_message()
                    )));
                }
            }
            Effect::None
        }

        // ── Misc ───────────────────────────────────────────────────────
        Action::Back => {
            if app.is_loading {
                return Effect::None;
            }
            app.notice = None;
            app.screen = match app.screen {
                Screen::Questionnaire | Screen::Result | Screen::Sessions => Screen::Dashboard,
                Screen::History => app.return_screen,
                other => other,
            };
            Effect::None
        }

        Action::DismissNotice => {
            app.notice = None;
            Effect::None
        }

        Action::BackendProbed(result) => {
            app.status_message = match result {
                Ok(()) => format!("Connected to {}", app.backend_label),
                Err(e) => {
                    warn!("Health probe failed: {}", e);
                    format!("Backend unreachable at {}", app.backend_label)
                }
            };
            Effect::None
        }

        Action::Quit => Effect::Quit,
    }
}

/// Shows a validation failure as a blocking notice.
fn raise(app: &mut App, error: ValidationError) {
    debug!("Validation: {}", error);
    app.notice = Some(Notice::error(error.to_string()));
}

fn log_in(app: &mut App, username: String) -> Effect {
    info!("Logged in as '{}'", username);
    app.identity.set(username.clone());
    app.login.reset();
    let dashboard = enter_dashboard(app, &username);
    if app.remember_user {
        Effect::Batch(vec![Effect::PersistIdentity(username), dashboard])
    } else {
        dashboard
    }
}

fn enter_dashboard(app: &mut App, username: &str) -> Effect {
    app.screen = Screen::Dashboard;
    app.status_message = format!("Logged in as {username}");
    app.latest_mood = Fetch::Loading;
    Effect::Request(Request::LatestMood(username.to_string()))
}
