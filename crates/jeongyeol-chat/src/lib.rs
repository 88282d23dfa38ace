//! Conversational Q&A over the approval reference, proxied to an external API.
//!
//! Request and reply shapes are always available; the HTTP client is gated
//! behind the `http` feature.

use serde::{Deserialize, Serialize};

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::{ChatClient, ChatError};

/// A question from the browser or CLI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    /// Continues an earlier conversation when non-empty.
    #[serde(default)]
    pub conversation_id: Option<String>,
}

impl ChatRequest {
    /// The conversation id, treating an empty string as absent.
    pub fn conversation(&self) -> Option<&str> {
        self.conversation_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// The answer relayed back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub success: bool,
    pub message: String,
    pub conversation_id: String,
    pub sources: Vec<serde_json::Value>,
}
