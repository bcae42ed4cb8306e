//! HTTP implementation of [`MoodBackend`] on top of reqwest.
//!
//! Every call follows the same shape: build the URL from the route table,
//! send (with a JSON body where the endpoint takes one), then either decode
//! the success body or turn the `{detail}` error body into
//! [`ApiError::Backend`]. No retries, no timeouts, no caching.

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::{Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::backend::{ApiError, GENERIC_DETAIL, MoodBackend};
use super::routes::{Endpoint, RouteStyle};
use super::types::{
    AccountRequest, AccountResponse, ChatHistoryResponse, ChatMessage, ChatMessageRequest,
    ChatReply, ChatSessionSummary, ChatSessionsResponse, ChatStart, DetectMoodRequest, ErrorBody,
    MoodHistoryEntry, MoodHistoryResponse, MoodVerdict, OpaqueId, StartChatRequest, UserCheck,
    UserCheckResponse,
};
use crate::core::questionnaire::AnswerSet;

/// Default backend address of the standalone server.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

pub struct HttpBackend {
    base_url: Url,
    routes: RouteStyle,
    client: reqwest::Client,
}

impl HttpBackend {
    /// Creates a backend rooted at `base_url`. Fails only if the URL cannot
    /// carry a path (e.g. `mailto:`) or does not parse.
    pub fn new(base_url: &str, routes: RouteStyle) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::Config(format!("invalid base URL '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Config(format!(
                "'{base_url}' cannot be used as a base URL"
            )));
        }

        Ok(Self {
            base_url,
            routes,
            client: reqwest::Client::new(),
        })
    }

    /// Full URL for an endpoint, percent-encoding every path segment.
    pub fn url(&self, endpoint: Endpoint<'_>) -> Result<Url, ApiError> {
        let segments = self.routes.segments(&endpoint);
        let mut url = self.base_url.clone();
        if segments.is_empty() {
            return Ok(url);
        }
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                ApiError::Config(format!("'{}' cannot be used as a base URL", self.base_url))
            })?;
            path.pop_if_empty();
            path.extend(segments.iter());
        }
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: Endpoint<'_>) -> Result<T, ApiError> {
        let url = self.url(endpoint)?;
        debug!("GET {}", url);
        let response = self.client.get(url).send().await.map_err(network_error)?;
        read_json(response).await
    }

    async fn post<B, T>(&self, endpoint: Endpoint<'_>, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(endpoint)?;
        debug!("POST {}", url);
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(network_error)?;
        read_json(response).await
    }
}

fn network_error(e: reqwest::Error) -> ApiError {
    warn!("Backend request failed: {}", e);
    ApiError::Network(e.to_string())
}

/// Checks the status and decodes the body, or converts the error body.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    debug!("Backend response status: {}", status);

    if !status.is_success() {
        return Err(error_from_response(response).await);
    }

    response.json::<T>().await.map_err(|e| {
        warn!("Failed to decode backend response: {}", e);
        ApiError::Decode(e.to_string())
    })
}

async fn error_from_response(response: Response) -> ApiError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    warn!("Backend error: {} - {}", status, body);

    let detail = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.message().map(str::to_string))
        .unwrap_or_else(|| GENERIC_DETAIL.to_string());

    ApiError::Backend { status, detail }
}

#[async_trait]
impl MoodBackend for HttpBackend {
    fn name(&self) -> &str {
        "http"
    }

    async fn check_user(&self, username: &str) -> Result<UserCheck, ApiError> {
        let res: UserCheckResponse = self.get(Endpoint::CheckUser(username)).await?;
        res.outcome().ok_or_else(|| {
            ApiError::Decode("check-user response has neither `exists` nor `action`".to_string())
        })
    }

    async fn signup(&self, username: &str) -> Result<AccountResponse, ApiError> {
        let res: AccountResponse = self
            .post(Endpoint::Signup, &AccountRequest { username })
            .await?;
        info!("Signup succeeded for '{}': {:?}", username, res.message);
        Ok(res)
    }

    async fn login(&self, username: &str) -> Result<AccountResponse, ApiError> {
        let res: AccountResponse = self
            .post(Endpoint::Login, &AccountRequest { username })
            .await?;
        info!("Login succeeded for '{}': {:?}", username, res.message);
        Ok(res)
    }

    async fn detect_mood(
        &self,
        username: &str,
        answers: &AnswerSet,
    ) -> Result<MoodVerdict, ApiError> {
        info!(
            "Submitting {} answers for '{}' to mood detection",
            answers.len(),
            username
        );
        self.post(Endpoint::DetectMood, &DetectMoodRequest { username, answers })
            .await
    }

    async fn mood_history(&self, username: &str) -> Result<Vec<MoodHistoryEntry>, ApiError> {
        let res: MoodHistoryResponse = self.get(Endpoint::MoodHistory(username)).await?;
        debug!("Loaded {} mood history entries", res.history.len());
        Ok(res.history)
    }

    async fn start_chat(
        &self,
        username: &str,
        mood_log_id: &OpaqueId,
    ) -> Result<ChatStart, ApiError> {
        let start: ChatStart = self
            .post(
                Endpoint::ChatStart,
                &StartChatRequest {
                    username,
                    mood_log_id,
                },
            )
            .await?;
        info!(
            "Chat session {} started (mood log {})",
            start.session_id, mood_log_id
        );
        Ok(start)
    }

    async fn send_message(
        &self,
        session_id: &OpaqueId,
        message: &str,
    ) -> Result<ChatReply, ApiError> {
        debug!(
            "Sending chat message to session {} (len={})",
            session_id,
            message.len()
        );
        self.post(
            Endpoint::ChatMessage,
            &ChatMessageRequest {
                session_id,
                message,
            },
        )
        .await
    }

    async fn end_chat(&self, session_id: &OpaqueId) -> Result<(), ApiError> {
        let url = self.url(Endpoint::ChatEnd(session_id))?;
        debug!("POST {}", url);
        let response = self.client.post(url).send().await.map_err(network_error)?;
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        info!("Chat session {} ended", session_id);
        Ok(())
    }

    async fn chat_history(&self, session_id: &OpaqueId) -> Result<Vec<ChatMessage>, ApiError> {
        let res: ChatHistoryResponse = self.get(Endpoint::ChatHistory(session_id)).await?;
        Ok(res.messages)
    }

    async fn chat_sessions(&self, username: &str) -> Result<Vec<ChatSessionSummary>, ApiError> {
        let res: ChatSessionsResponse = self.get(Endpoint::ChatSessions(username)).await?;
        Ok(res.sessions)
    }

    async fn health(&self) -> Result<(), ApiError> {
        let url = self.url(Endpoint::Health)?;
        let response = self.client.get(url).send().await.map_err(network_error)?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_from_response(response).await)
        }
    }
}
