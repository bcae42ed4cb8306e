//! # Chat Session
//!
//! Transcript of one companion conversation. User messages are appended as
//! soon as they are composed; the assistant reply follows when the backend
//! answers. While a reply is outstanding (`pending`) no further message can
//! be composed, so sends never overlap.

use chrono::Local;
use log::warn;

use crate::api::{ChatMessage, ChatSessionSummary, ChatStart, OpaqueId, Role};
use crate::core::validation::ValidationError;

/// Shown in place of the assistant reply when sending fails.
pub const FALLBACK_REPLY: &str = "I apologize, but I encountered an issue. Please try again.";

/// Where the chat was opened from; decides where ending it returns to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatOrigin {
    /// Started from a fresh mood result.
    Result,
    /// Reopened from the past-sessions picker.
    Resumed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatSession {
    pub id: OpaqueId,
    pub mood: String,
    pub transcript: Vec<ChatMessage>,
    pub pending: bool,
    pub origin: ChatOrigin,
}

fn now_stamp() -> Option<String> {
    Some(Local::now().to_rfc3339())
}

impl ChatSession {
    /// New session; the greeting is the only message.
    pub fn start(start: ChatStart) -> Self {
        Self {
            id: start.session_id,
            mood: start.mood,
            transcript: vec![ChatMessage {
                role: Role::Assistant,
                content: start.greeting,
                created_at: now_stamp(),
            }],
            pending: false,
            origin: ChatOrigin::Result,
        }
    }

    /// Existing session with its stored transcript.
    pub fn resume(summary: &ChatSessionSummary, transcript: Vec<ChatMessage>) -> Self {
        Self {
            id: summary.id.clone(),
            mood: summary.mood.clone(),
            transcript,
            pending: false,
            origin: ChatOrigin::Resumed,
        }
    }

    /// Appends a user message and marks a reply as pending.
    ///
    /// Returns the trimmed text that should be sent.
    pub fn compose(&mut self, input: &str) -> Result<String, ValidationError> {
        if self.pending {
            return Err(ValidationError::ReplyPending);
        }
        let text = input.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyMessage);
        }
        self.transcript.push(ChatMessage {
            role: Role::User,
            content: text.to_string(),
            created_at: now_stamp(),
        });
        self.pending = true;
        Ok(text.to_string())
    }

    pub fn receive_reply(&mut self, reply: String) {
        if !self.pending {
            warn!("Chat reply arrived with no message pending; appending anyway");
        }
        self.transcript.push(ChatMessage {
            role: Role::Assistant,
            content: reply,
            created_at: now_stamp(),
        });
        self.pending = false;
    }

    /// Appends the fallback reply. The real error is the caller's to log.
    pub fn reply_failed(&mut self) {
        self.receive_reply(FALLBACK_REPLY.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> ChatSession {
        ChatSession::start(ChatStart {
            session_id: OpaqueId::Number(7),
            mood: "Stressed".to_string(),
            greeting: "Hi, I'm here for you.".to_string(),
        })
    }

    #[test]
    fn test_start_seeds_greeting_only() {
        let chat = session();
        assert_eq!(chat.transcript.len(), 1);
        assert_eq!(chat.transcript[0].role, Role::Assistant);
        assert_eq!(chat.transcript[0].content, "Hi, I'm here for you.");
        assert!(!chat.pending);
        assert_eq!(chat.origin, ChatOrigin::Result);
    }

    #[test]
    fn test_compose_appends_trimmed_message() {
        let mut chat = session();
        let text = chat.compose("  rough day  ").unwrap();
        assert_eq!(text, "rough day");
        assert!(chat.pending);
        assert_eq!(chat.transcript.last().unwrap().content, "rough day");
        assert_eq!(chat.transcript.last().unwrap().role, Role::User);
    }

    #[test]
    fn test_compose_ignores_blank_input() {
        let mut chat = session();
        assert_eq!(chat.compose(" \n\t"), Err(ValidationError::EmptyMessage));
        assert_eq!(chat.transcript.len(), 1);
        assert!(!chat.pending);
    }

    #[test]
    fn test_compose_locked_while_pending() {
        let mut chat = session();
        chat.compose("first").unwrap();
        assert_eq!(chat.compose("second"), Err(ValidationError::ReplyPending));
        assert_eq!(chat.transcript.len(), 2);
    }

    #[test]
    fn test_reply_is_verbatim() {
        let mut chat = session();
        chat.compose("hello").unwrap();
        chat.receive_reply("  **Breathe** with me.\n".to_string());
        assert!(!chat.pending);
        assert_eq!(chat.transcript[2].content, "  **Breathe** with me.\n");
    }

    #[test]
    fn test_failure_appends_exactly_one_fallback() {
        let mut chat = session();
        chat.compose("hello").unwrap();
        let before = chat.transcript.len();
        chat.reply_failed();
        assert_eq!(chat.transcript.len(), before + 1);
        assert_eq!(chat.transcript[before].content, FALLBACK_REPLY);
        assert_eq!(chat.transcript[before].role, Role::Assistant);
        assert!(!chat.pending);
    }

    #[test]
    fn test_resume_uses_summary_mood() {
        let summary = ChatSessionSummary {
            id: OpaqueId::Text("s-1".to_string()),
            mood_log_id: Some(OpaqueId::Number(3)),
            mood: "Tired/Exhausted".to_string(),
            started_at: None,
            ended_at: None,
        };
        let chat = ChatSession::resume(&summary, Vec::new());
        assert_eq!(chat.id, OpaqueId::Text("s-1".to_string()));
        assert_eq!(chat.mood, "Tired/Exhausted");
        assert_eq!(chat.origin, ChatOrigin::Resumed);
        assert!(chat.transcript.is_empty());
    }
}
