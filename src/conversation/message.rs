//! Chat transcript turns

use crate::llm::LlmErrorKind;
use crate::reply::CONNECT_PROMPT;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who authored a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// Turn body. The variant is fixed when the turn is created; markup is
/// never detected from the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "format", content = "body", rename_all = "snake_case")]
pub enum MessageContent {
    PlainText(String),
    RichText(String),
}

impl MessageContent {
    pub fn as_str(&self) -> &str {
        match self {
            MessageContent::PlainText(text) | MessageContent::RichText(text) => text,
        }
    }

    pub fn is_rich(&self) -> bool {
        matches!(self, MessageContent::RichText(_))
    }
}

/// One appended turn. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: MessageContent,
    pub created_at: DateTime<Utc>,
    /// Render a "Connect with Preceptor" action under this turn
    #[serde(default)]
    pub offer_connect: bool,
    /// Render a link to the community forum under this turn
    #[serde(default)]
    pub offer_community_link: bool,
}

impl Message {
    fn new(role: Role, content: MessageContent) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            content,
            created_at: Utc::now(),
            offer_connect: false,
            offer_community_link: false,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, MessageContent::PlainText(text.into()))
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, MessageContent::PlainText(text.into()))
    }

    /// The fixed turn that offers a call with a preceptor
    pub fn connect_prompt() -> Self {
        let mut msg = Self::assistant(CONNECT_PROMPT);
        msg.offer_connect = true;
        msg
    }

    /// First turn of every conversation
    pub fn welcome(community_url: &str) -> Self {
        let body = format!(
            "Hey, I'm an AI agent, here to help answer your questions. You can also join our \
             <a href='{community_url}' target='_blank' rel='noopener noreferrer'>Nursing Community</a> \
             here for peer-to-peer support."
        );
        let mut msg = Self::new(Role::Assistant, MessageContent::RichText(body));
        msg.offer_community_link = true;
        msg
    }

    /// Visible turn for a reply that could not be produced
    pub fn reply_failed(kind: LlmErrorKind) -> Self {
        let text = if kind.is_transport() {
            "I couldn't reach the assistant service. Please check your connection and try again."
        } else {
            "The assistant service couldn't answer that right now. Please try again in a moment."
        };
        Self::assistant(text)
    }

    pub fn text(&self) -> &str {
        self.content.as_str()
    }
}
