//! Runs a core [`Request`] against a backend and turns the outcome into the
//! [`Action`] that reports it. Every request yields exactly one action.

use log::debug;

use super::backend::MoodBackend;
use super::types::UserCheck;
use crate::core::action::{Action, Request};

pub async fn dispatch(backend: &dyn MoodBackend, request: Request) -> Action {
    debug!("Dispatching {:?} via {}", request, backend.name());
    match request {
        Request::CheckUser(username) => {
            let result = backend.check_user(&username).await;
            Action::UserChecked { username, result }
        }
        Request::Signup(username) => {
            let result = backend.signup(&username).await;
            Action::AccountResolved {
                username,
                check: UserCheck::New,
                result,
            }
        }
        Request::Login(username) => {
            let result = backend.login(&username).await;
            Action::AccountResolved {
                username,
                check: UserCheck::Existing,
                result,
            }
        }
        Request::DetectMood { username, answers } => {
            Action::MoodDetected(backend.detect_mood(&username, &answers).await)
        }
        Request::LatestMood(username) => {
            Action::LatestMoodLoaded(backend.mood_history(&username).await)
        }
        Request::MoodHistory(username) => {
            Action::HistoryLoaded(backend.mood_history(&username).await)
        }
        Request::StartChat {
            username,
            mood_log_id,
        } => Action::ChatStarted(backend.start_chat(&username, &mood_log_id).await),
        Request::SendMessage {
            session_id,
            message,
        } => {
            let result = backend.send_message(&session_id, &message).await;
            Action::ReplyReceived { session_id, result }
        }
        Request::EndChat(session_id) => {
            let result = backend.end_chat(&session_id).await;
            Action::ChatEnded { session_id, result }
        }
        Request::ChatHistory(summary) => {
            let result = backend.chat_history(&summary.id).await;
            Action::SessionResumed { summary, result }
        }
        Request::ChatSessions(username) => {
            Action::SessionsLoaded(backend.chat_sessions(&username).await)
        }
        Request::Health => Action::BackendProbed(backend.health().await),
    }
}
