//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! The event loop uses conditional redraw to avoid unnecessary work:
//!
//! - **Animating** (a call is in flight, or a reply is pending): draws every
//!   ~80ms so the spinner moves.
//! - **Idle**: sleeps up to 500ms and only redraws on events, resize, or a
//!   completed backend call.
//!
//! ## Backend Calls
//!
//! `update` never performs I/O. It returns `Effect::Request`, which is
//! spawned on the tokio runtime; the finished call comes back through an
//! mpsc channel as exactly one `Action`.

mod component;
mod components;
mod event;
mod keymap;
pub mod markup;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::api::{HttpBackend, MoodBackend, OpaqueId, dispatch};
use crate::core::action::{Action, Effect, Request, update};
use crate::core::config::ResolvedConfig;
use crate::core::identity::UsernameCache;
use crate::core::state::{App, Screen};
use crate::tui::components::{
    DashboardItem, HistoryState, InputBox, MenuState, MessageListState, QuestionnaireState,
    ResultItem, SessionPickerState,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    // Persistent component states
    pub username_input: InputBox,
    pub chat_input: InputBox,
    pub message_list: MessageListState,
    pub dashboard_menu: MenuState,
    pub result_menu: MenuState,
    pub questionnaire: QuestionnaireState,
    pub history: HistoryState,
    pub session_picker: SessionPickerState,
    /// "End this conversation?" is showing
    pub confirm_end_chat: bool,
    // Change detection for `sync`
    last_screen: Screen,
    chat_id: Option<OpaqueId>,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        let mut username_input = InputBox::single_line("Username");
        username_input.placeholder = String::from("Type your username and press Enter");
        let mut chat_input = InputBox::composer("Message");
        chat_input.placeholder = String::from("Share what's on your mind...");

        Self {
            username_input,
            chat_input,
            message_list: MessageListState::new(),
            dashboard_menu: MenuState::new(DashboardItem::ALL.len()),
            result_menu: MenuState::new(ResultItem::ALL.len()),
            questionnaire: QuestionnaireState::default(),
            history: HistoryState::default(),
            session_picker: SessionPickerState::default(),
            confirm_end_chat: false,
            last_screen: Screen::Login,
            chat_id: None,
        }
    }

    /// Aligns presentation state with the core state after any update.
    pub fn sync(&mut self, app: &App) {
        if app.screen != self.last_screen {
            match app.screen {
                Screen::Login => self.username_input.clear(),
                Screen::Dashboard => self.dashboard_menu.reset(),
                Screen::Result => self.result_menu.reset(),
                Screen::History => self.history.reset(),
                Screen::Sessions => self.session_picker.reset(),
                Screen::Questionnaire | Screen::Chat => {}
            }
            self.last_screen = app.screen;
        }

        let chat_id = app.chat.as_ref().map(|c| c.id.clone());
        if chat_id != self.chat_id {
            self.message_list = MessageListState::new();
            self.chat_input.clear();
            self.confirm_end_chat = false;
            self.chat_id = chat_id;
        }

        self.username_input.locked = app.login.is_busy();
        self.chat_input.locked = app.chat.as_ref().is_some_and(|c| c.pending);
        self.questionnaire.sync(&app.wizard);
        self.history.set_len(app.history.loaded().map_or(0, Vec::len));
        self.session_picker
            .set_len(app.sessions.loaded().map_or(0, Vec::len));
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol lets Shift+Enter through; terminals without it ignore the flags
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// Build the HTTP backend described by a resolved config.
pub fn build_backend(config: &ResolvedConfig) -> std::io::Result<Arc<dyn MoodBackend>> {
    let backend = HttpBackend::new(&config.base_url, config.routes).map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("invalid backend URL '{}': {}", config.base_url, e),
        )
    })?;
    info!(
        "Using backend {} ({} routes)",
        config.base_url,
        config.routes.label()
    );
    Ok(Arc::new(backend))
}

/// Username to restore at start-up; nothing when remembering is off.
fn remembered_user(config: &ResolvedConfig, cache: Option<&UsernameCache>) -> Option<String> {
    if !config.remember_user {
        return None;
    }
    cache.and_then(UsernameCache::load)
}

/// Everything the loop needs to carry out an `Effect`.
struct Runtime {
    backend: Arc<dyn MoodBackend>,
    cache: Option<UsernameCache>,
    tx: mpsc::Sender<Action>,
}

impl Runtime {
    /// Carries out `effect`. Returns true when the app should exit.
    fn apply(&self, effect: Effect) -> bool {
        let mut quit = false;
        for effect in effect.into_list() {
            match effect {
                Effect::None | Effect::Batch(_) => {}
                Effect::Quit => quit = true,
                Effect::Request(request) => {
                    spawn_request(self.backend.clone(), request, self.tx.clone())
                }
                Effect::PersistIdentity(username) => {
                    if let Some(cache) = &self.cache
                        && let Err(e) = cache.store(&username)
                    {
                        warn!("Failed to remember '{}': {}", username, e);
                    }
                }
                Effect::ForgetIdentity => {
                    if let Some(cache) = &self.cache
                        && let Err(e) = cache.clear()
                    {
                        warn!("Failed to clear remembered user: {}", e);
                    }
                }
            }
        }
        quit
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let backend = build_backend(&config)?;
    let mut app = App::from_config(&config);
    let mut tui = TuiState::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    let runtime = Runtime {
        backend,
        cache: config.username_cache(),
        tx,
    };

    runtime.apply(Effect::Request(Request::Health));
    if let Some(username) = remembered_user(&config, runtime.cache.as_ref()) {
        let effect = update(&mut app, Action::RestoreIdentity(username));
        runtime.apply(effect);
    }

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    'main: loop {
        tui.sync(&app);

        let animating = app.is_loading || app.chat.as_ref().is_some_and(|c| c.pending);
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 4.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        // Short timeout while animating (~12fps), long when idle
        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if matches!(event, TuiEvent::Resize) {
                continue;
            }
            if let Some(action) = keymap::route(&app, &mut tui, &event) {
                debug!("Key {:?} -> {:?}", event, action);
                let effect = update(&mut app, action);
                if runtime.apply(effect) {
                    break 'main;
                }
                tui.sync(&app);
            }
        }

        // Completed backend calls
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let effect = update(&mut app, action);
            if runtime.apply(effect) {
                break 'main;
            }
        }
    }

    // Close an open conversation so the backend records its end
    if let Some(chat) = app.chat.take() {
        info!("Closing chat session {} on exit", chat.id);
        let backend = runtime.backend.clone();
        let closed = tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                tokio::time::timeout(Duration::from_secs(2), backend.end_chat(&chat.id)).await
            })
        });
        match closed {
            Ok(Ok(())) => debug!("Session {} closed", chat.id),
            Ok(Err(e)) => warn!("chat/end on exit failed: {}", e),
            Err(_) => warn!("chat/end on exit timed out"),
        }
    }

    ratatui::restore();
    info!("Mira shutting down");
    Ok(())
}

/// Runs one backend call in the background and posts its `Action` back.
fn spawn_request(backend: Arc<dyn MoodBackend>, request: Request, tx: mpsc::Sender<Action>) {
    debug!("Spawning request {:?}", request);
    tokio::spawn(async move {
        let action = dispatch(backend.as_ref(), request).await;
        if tx.send(action).is_err() {
            warn!("Failed to deliver backend result: receiver dropped");
        }
    });
}
