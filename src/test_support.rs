//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::{
    AccountResponse, ApiError, ChatMessage, ChatReply, ChatSessionSummary, ChatStart,
    MoodBackend, MoodHistoryEntry, MoodVerdict, OpaqueId, UserCheck,
};
use crate::core::action::{Action, update};
use crate::core::questionnaire::AnswerSet;
use crate::core::state::App;

/// A scripted backend. Every call returns a clone of its configured result
/// and is recorded by name.
pub struct StubBackend {
    user_check: Result<UserCheck, ApiError>,
    account: Result<AccountResponse, ApiError>,
    verdict: Result<MoodVerdict, ApiError>,
    history: Result<Vec<MoodHistoryEntry>, ApiError>,
    chat_start: Result<ChatStart, ApiError>,
    reply: Result<ChatReply, ApiError>,
    transcript: Result<Vec<ChatMessage>, ApiError>,
    sessions: Result<Vec<ChatSessionSummary>, ApiError>,
    pub calls: Mutex<Vec<String>>,
}

impl Default for StubBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl StubBackend {
    pub fn new() -> Self {
        Self {
            user_check: Ok(UserCheck::New),
            account: Ok(AccountResponse::default()),
            verdict: Ok(MoodVerdict {
                mood: "Neutral".to_string(),
                log_id: OpaqueId::Number(1),
            }),
            history: Ok(Vec::new()),
            chat_start: Ok(ChatStart {
                session_id: OpaqueId::Number(1),
                mood: "Neutral".to_string(),
                greeting: "Hello".to_string(),
            }),
            reply: Ok(ChatReply {
                response: "I'm listening.".to_string(),
                message_id: None,
            }),
            transcript: Ok(Vec::new()),
            sessions: Ok(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_user_check(mut self, result: Result<UserCheck, ApiError>) -> Self {
        self.user_check = result;
        self
    }

    pub fn with_verdict(mut self, result: Result<MoodVerdict, ApiError>) -> Self {
        self.verdict = result;
        self
    }

    pub fn with_reply(mut self, result: Result<ChatReply, ApiError>) -> Self {
        self.reply = result;
        self
    }

    fn record(&self, call: &str) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call.to_string());
        }
    }
}

#[async_trait]
impl MoodBackend for StubBackend {
    fn name(&self) -> &str {
        "stub"
    }

    async fn check_user(&self, _username: &str) -> Result<UserCheck, ApiError> {
        self.record("check_user");
        self.user_check.clone()
    }

    async fn signup(&self, _username: &str) -> Result<AccountResponse, ApiError> {
        self.record("signup");
        self.account.clone()
    }

    async fn login(&self, _username: &str) -> Result<AccountResponse, ApiError> {
        self.record("login");
        self.account.clone()
    }

    async fn detect_mood(
        &self,
        _username: &str,
        _answers: &AnswerSet,
    ) -> Result<MoodVerdict, ApiError> {
        self.record("detect_mood");
        self.verdict.clone()
    }

    async fn mood_history(&self, _username: &str) -> Result<Vec<MoodHistoryEntry>, ApiError> {
        self.record("mood_history");
        self.history.clone()
    }

    async fn start_chat(
        &self,
        _username: &str,
        _mood_log_id: &OpaqueId,
    ) -> Result<ChatStart, ApiError> {
        self.record("start_chat");
        self.chat_start.clone()
    }

    async fn send_message(
        &self,
        _session_id: &OpaqueId,
        _message: &str,
    ) -> Result<ChatReply, ApiError> {
        self.record("send_message");
        self.reply.clone()
    }

    async fn end_chat(&self, _session_id: &OpaqueId) -> Result<(), ApiError> {
        self.record("end_chat");
        Ok(())
    }

    async fn chat_history(&self, _session_id: &OpaqueId) -> Result<Vec<ChatMessage>, ApiError> {
        self.record("chat_history");
        self.transcript.clone()
    }

    async fn chat_sessions(&self, _username: &str) -> Result<Vec<ChatSessionSummary>, ApiError> {
        self.record("chat_sessions");
        self.sessions.clone()
    }

    async fn health(&self) -> Result<(), ApiError> {
        self.record("health");
        Ok(())
    }
}

/// Creates a fresh App on the login screen.
pub fn test_app() -> App {
    App::new("http://test.invalid".to_string())
}

/// Creates an App already logged in as `username`, sitting on the dashboard.
pub fn logged_in_app(username: &str) -> App {
    let mut app = test_app();
    update(&mut app, Action::RestoreIdentity(username.to_string()));
    app
}
