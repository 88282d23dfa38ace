//! HTTP client for the blocking-mode chat endpoint.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::ChatReply;

/// Upper bound on one round trip to the chat API.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

const FALLBACK_ANSWER: &str = "응답을 받을 수 없습니다.";
const RESPONSE_MODE: &str = "blocking";
const API_USER: &str = "web_user";

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("message is empty")]
    EmptyMessage,
    #[error("chat API url or key is not configured")]
    NotConfigured,
    #[error("chat API request timed out")]
    Timeout,
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("chat API returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ChatError {
    /// HTTP status to relay to the browser.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::EmptyMessage => 400,
            Self::Timeout => 504,
            Self::Server { status, .. } => *status,
            Self::NotConfigured | Self::Http(_) | Self::Json(_) => 500,
        }
    }

    /// Message shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyMessage => "메시지를 입력해주세요.".to_string(),
            Self::NotConfigured => "대화 API 설정이 필요합니다.".to_string(),
            Self::Timeout => "요청 시간이 초과되었습니다. 다시 시도해주세요.".to_string(),
            Self::Http(e) => format!("네트워크 오류: {e}"),
            Self::Server { status, .. } => format!("대화 API 오류: {status}"),
            Self::Json(e) => format!("AI 응답 생성 중 오류가 발생했습니다: {e}"),
        }
    }

    /// Upstream response body, when the API answered with an error status.
    pub fn details(&self) -> Option<&str> {
        match self {
            Self::Server { body, .. } => Some(body),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct Payload<'a> {
    inputs: serde_json::Map<String, serde_json::Value>,
    query: &'a str,
    response_mode: &'static str,
    user: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    conversation_id: Option<&'a str>,
}

#[derive(Deserialize, Default)]
struct ApiResponse {
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    conversation_id: Option<String>,
    #[serde(default)]
    metadata: Option<ApiMetadata>,
}

#[derive(Deserialize, Default)]
struct ApiMetadata {
    #[serde(default)]
    sources: Vec<serde_json::Value>,
}

impl From<ApiResponse> for ChatReply {
    fn from(resp: ApiResponse) -> Self {
        Self {
            success: true,
            message: resp.answer.unwrap_or_else(|| FALLBACK_ANSWER.to_string()),
            conversation_id: resp.conversation_id.unwrap_or_default(),
            sources: resp.metadata.map(|m| m.sources).unwrap_or_default(),
        }
    }
}

/// Client for the external chat API.
pub struct ChatClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ChatClient {
    /// Create a client for `base_url` (no trailing slash needed).
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, ChatError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Create a client from optional settings; both must be present and
    /// non-empty.
    pub fn from_settings(
        base_url: Option<&str>,
        api_key: Option<&str>,
    ) -> Result<Self, ChatError> {
        match (base_url, api_key) {
            (Some(url), Some(key)) if !url.is_empty() && !key.is_empty() => Self::new(url, key),
            _ => Err(ChatError::NotConfigured),
        }
    }

    /// Ask one question, optionally continuing a conversation.
    pub async fn ask(
        &self,
        message: &str,
        conversation_id: Option<&str>,
    ) -> Result<ChatReply, ChatError> {
        if message.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let url = format!("{}/chat", self.base_url);
        let payload = Payload {
            inputs: serde_json::Map::new(),
            query: message,
            response_mode: RESPONSE_MODE,
            user: API_USER,
            conversation_id: conversation_id.filter(|id| !id.is_empty()),
        };

        info!(url = %url, continued = payload.conversation_id.is_some(), "asking chat API");
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(timeout_or_http)?;

        let status = resp.status();
        let body = resp.text().await.map_err(timeout_or_http)?;
        if !status.is_success() {
            return Err(ChatError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ApiResponse = serde_json::from_str(&body)?;
        let reply = ChatReply::from(parsed);
        info!(conversation_id = %reply.conversation_id, sources = reply.sources.len(), "chat answer received");
        Ok(reply)
    }
}

fn timeout_or_http(e: reqwest::Error) -> ChatError {
    if e.is_timeout() {
        ChatError::Timeout
    } else {
        ChatError::Http(e)
    }
}
