//! Assistant conversation records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::flexible_time;

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Ai,
}

impl Role {
    /// Label used in rendered transcripts.
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Ai => "Assistant",
        }
    }
}

/// A canned follow-up question offered under an assistant message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub text: String,
    pub category: String,
}

impl Suggestion {
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
        }
    }
}

/// One entry of a conversation, held in page memory only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: u64,

    #[serde(rename = "type")]
    pub role: Role,

    pub content: String,

    #[serde(with = "flexible_time")]
    pub timestamp: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<Suggestion>,

    /// Set when the content is a diagnostic rather than an answer
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

/// The assistant's answer to one message, normalized across wire shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub answer: String,
    pub conversation_id: String,
    pub message_id: String,
    #[serde(with = "flexible_time")]
    pub created_at: DateTime<Utc>,
}
