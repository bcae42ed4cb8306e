//! Wire types for the mood backend.
//!
//! Request bodies borrow from the caller; response bodies are owned and only
//! carry the fields the client renders. Unknown fields are ignored so either
//! backend flavour deserializes into the same types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::questionnaire::AnswerSet;

/// Identifier minted by the backend (mood log ids, chat session ids).
///
/// The client never interprets these. Numbers stay numbers and strings stay
/// strings, so the value is echoed back exactly as it was received.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum OpaqueId {
    Number(i64),
    Text(String),
}

impl fmt::Display for OpaqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpaqueId::Number(n) => write!(f, "{n}"),
            OpaqueId::Text(s) => f.write_str(s),
        }
    }
}

// ============================================================================
// Identity
// ============================================================================

/// Outcome of a username lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCheck {
    /// Registered: the next step is a login.
    Existing,
    /// Unknown: the next step is a signup.
    New,
}

/// `GET /check-user/{username}`.
///
/// The flat backend answers `{exists: bool}`, the prefixed one adds
/// `{action: "login" | "signup"}`. `exists` wins when both are present.
#[derive(Deserialize, Debug, Default)]
pub struct UserCheckResponse {
    #[serde(default)]
    pub exists: Option<bool>,
    #[serde(default)]
    pub action: Option<String>,
}

impl UserCheckResponse {
    pub fn outcome(&self) -> Option<UserCheck> {
        match (self.exists, self.action.as_deref()) {
            (Some(true), _) => Some(UserCheck::Existing),
            (Some(false), _) => Some(UserCheck::New),
            (None, Some("login")) => Some(UserCheck::Existing),
            (None, Some("signup")) => Some(UserCheck::New),
            _ => None,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct AccountRequest<'a> {
    pub username: &'a str,
}

/// Success body of `/signup` and `/login`.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
pub struct AccountResponse {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

// ============================================================================
// Mood
// ============================================================================

#[derive(Serialize, Debug)]
pub struct DetectMoodRequest<'a> {
    pub username: &'a str,
    pub answers: &'a AnswerSet,
}

/// Classification returned by `/detect-mood`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct MoodVerdict {
    pub mood: String,
    pub log_id: OpaqueId,
}

/// One past classification, newest first as delivered.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct MoodHistoryEntry {
    #[serde(default)]
    pub id: Option<OpaqueId>,
    pub mood: String,
    pub created_at: String,
    /// Questionnaire answers the classification was made from, when stored.
    #[serde(default)]
    pub answers: Option<serde_json::Value>,
}

#[derive(Deserialize, Debug)]
pub struct MoodHistoryResponse {
    #[serde(default)]
    pub history: Vec<MoodHistoryEntry>,
}

// ============================================================================
// Chat
// ============================================================================

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct StartChatRequest<'a> {
    pub username: &'a str,
    pub mood_log_id: &'a OpaqueId,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ChatStart {
    pub session_id: OpaqueId,
    pub mood: String,
    pub greeting: String,
}

#[derive(Serialize, Debug)]
pub struct ChatMessageRequest<'a> {
    pub session_id: &'a OpaqueId,
    pub message: &'a str,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub response: String,
    #[serde(default)]
    pub message_id: Option<OpaqueId>,
}

#[derive(Deserialize, Debug)]
pub struct ChatHistoryResponse {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

/// A chat thread owned by the user, as listed by `/chat/sessions/{username}`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ChatSessionSummary {
    pub id: OpaqueId,
    #[serde(default)]
    pub mood_log_id: Option<OpaqueId>,
    #[serde(default)]
    pub mood: String,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub ended_at: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct ChatSessionsResponse {
    #[serde(default)]
    pub sessions: Vec<ChatSessionSummary>,
}

/// Error body of a non-success response. FastAPI sends a string for
/// application errors and a list of objects for request validation errors.
#[derive(Deserialize, Debug, Default)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    pub fn message(&self) -> Option<&str> {
        self.detail.as_ref().and_then(|d| d.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opaque_id_keeps_number_shape() {
        let verdict: MoodVerdict =
            serde_json::from_str(r#"{"mood":"Stressed","log_id":42,"status":"success"}"#).unwrap();
        assert_eq!(verdict.log_id, OpaqueId::Number(42));
        assert_eq!(serde_json::to_string(&verdict.log_id).unwrap(), "42");
    }

    #[test]
    fn test_opaque_id_keeps_string_shape() {
        let start: ChatStart = serde_json::from_str(
            r#"{"session_id":"a1b2","mood":"Neutral","greeting":"Hi"}"#,
        )
        .unwrap();
        assert_eq!(start.session_id, OpaqueId::Text("a1b2".to_string()));
        assert_eq!(start.session_id.to_string(), "a1b2");
        assert_eq!(serde_json::to_string(&start.session_id).unwrap(), "\"a1b2\"");
    }

    #[test]
    fn test_user_check_accepts_exists_flag() {
        let res: UserCheckResponse =
            serde_json::from_str(r#"{"username":"alice","exists":false}"#).unwrap();
        assert_eq!(res.outcome(), Some(UserCheck::New));
    }

    #[test]
    fn test_user_check_accepts_action_field() {
        let res: UserCheckResponse = serde_json::from_str(r#"{"action":"login"}"#).unwrap();
        assert_eq!(res.outcome(), Some(UserCheck::Existing));
    }

    #[test]
    fn test_user_check_exists_wins_over_action() {
        let res: UserCheckResponse =
            serde_json::from_str(r#"{"exists":true,"action":"signup"}"#).unwrap();
        assert_eq!(res.outcome(), Some(UserCheck::Existing));
    }

    #[test]
    fn test_user_check_without_either_field_is_undecidable() {
        let res: UserCheckResponse = serde_json::from_str(r#"{"username":"alice"}"#).unwrap();
        assert_eq!(res.outcome(), None);
    }

    #[test]
    fn test_history_entry_keeps_answers() {
        let res: MoodHistoryResponse = serde_json::from_str(
            r#"{"username":"alice","total_entries":1,"history":[
                {"id":3,"mood":"Tired/Exhausted","answers":{"q1":"B"},"created_at":"2024-01-15 10:30:00"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(res.history.len(), 1);
        assert_eq!(res.history[0].mood, "Tired/Exhausted");
        assert_eq!(res.history[0].id, Some(OpaqueId::Number(3)));
        assert_eq!(
            res.history[0].answers,
            Some(serde_json::json!({"q1": "B"}))
        );
    }

    #[test]
    fn test_history_entry_without_answers() {
        let res: MoodHistoryResponse = serde_json::from_str(
            r#"{"history":[{"mood":"Sad","created_at":"2024-01-15 10:30:00"}]}"#,
        )
        .unwrap();
        assert_eq!(res.history[0].answers, None);
        assert_eq!(res.history[0].id, None);
    }

    #[test]
    fn test_chat_message_roles_are_lowercase() {
        let msg: ChatMessage =
            serde_json::from_str(r#"{"role":"assistant","content":"Hello"}"#).unwrap();
        assert_eq!(msg.role, Role::Assistant);
        assert_eq!(msg.created_at, None);
        let json = serde_json::to_value(ChatMessage {
            role: Role::User,
            content: "hey".to_string(),
            created_at: None,
        })
        .unwrap();
        assert_eq!(json["role"], "user");
    }

    #[test]
    fn test_error_body_string_detail() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"detail":"Username already exists. Please login instead."}"#)
                .unwrap();
        assert_eq!(
            body.message(),
            Some("Username already exists. Please login instead.")
        );
    }

    #[test]
    fn test_error_body_structured_detail_has_no_message() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"detail":[{"loc":["body","username"],"msg":"field required"}]}"#)
                .unwrap();
        assert_eq!(body.message(), None);
    }
}
