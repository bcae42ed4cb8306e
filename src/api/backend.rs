use async_trait::async_trait;
use thiserror::Error;

use super::types::{
    AccountResponse, ChatMessage, ChatReply, ChatSessionSummary, ChatStart, MoodHistoryEntry,
    MoodVerdict, OpaqueId, UserCheck,
};
use crate::core::questionnaire::AnswerSet;

/// Shown for every failure that is not a structured backend error.
pub const CONNECTIVITY_MESSAGE: &str = "Error connecting to server. Please try again.";

/// Used when a non-success response carries no readable `detail`.
pub const GENERIC_DETAIL: &str = "An error occurred";

/// Errors surfaced by the backend gateway.
///
/// Only `Backend` carries text meant for the user; everything else is
/// reported with [`CONNECTIVITY_MESSAGE`] and the specifics go to the log.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Non-success HTTP status with the backend's `detail` message.
    #[error("{detail} (HTTP {status})")]
    Backend { status: u16, detail: String },
    /// The request never produced a response (DNS, refused connection, reset).
    #[error("network error: {0}")]
    Network(String),
    /// A success response whose body did not match the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
    /// The configured base URL cannot be used to build request URLs.
    #[error("config error: {0}")]
    Config(String),
}

impl ApiError {
    /// Text shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Backend { detail, .. } => detail.clone(),
            _ => CONNECTIVITY_MESSAGE.to_string(),
        }
    }
}

/// The backend as seen by the client: one async call per endpoint.
///
/// `HttpBackend` is the real implementation; tests substitute scripted ones.
#[async_trait]
pub trait MoodBackend: Send + Sync {
    /// Returns a short name for logs.
    fn name(&self) -> &str;

    async fn check_user(&self, username: &str) -> Result<UserCheck, ApiError>;

    async fn signup(&self, username: &str) -> Result<AccountResponse, ApiError>;

    async fn login(&self, username: &str) -> Result<AccountResponse, ApiError>;

    async fn detect_mood(
        &self,
        username: &str,
        answers: &AnswerSet,
    ) -> Result<MoodVerdict, ApiError>;

    async fn mood_history(&self, username: &str) -> Result<Vec<MoodHistoryEntry>, ApiError>;

    async fn start_chat(
        &self,
        username: &str,
        mood_log_id: &OpaqueId,
    ) -> Result<ChatStart, ApiError>;

    async fn send_message(
        &self,
        session_id: &OpaqueId,
        message: &str,
    ) -> Result<ChatReply, ApiError>;

    /// Tells the backend the session is over. Callers treat this as best-effort.
    async fn end_chat(&self, session_id: &OpaqueId) -> Result<(), ApiError>;

    async fn chat_history(&self, session_id: &OpaqueId) -> Result<Vec<ChatMessage>, ApiError>;

    async fn chat_sessions(&self, username: &str) -> Result<Vec<ChatSessionSummary>, ApiError>;

    /// Cheap reachability probe.
    async fn health(&self) -> Result<(), ApiError>;
}
