//! Conversation state types

use super::message::Message;
use serde::{Deserialize, Serialize};

/// Reply lifecycle of the chat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatPhase {
    /// Ready for user input
    #[default]
    Idle,

    /// User turn appended, reply not yet resolved
    AwaitingReply,
}

/// State driven by the transition function. `call_open` is independent of
/// the phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ChatState {
    pub phase: ChatPhase,
    pub call_open: bool,
}

impl ChatState {
    pub fn is_busy(&self) -> bool {
        matches!(self.phase, ChatPhase::AwaitingReply)
    }
}

/// Ordered transcript plus the chat state. Insertion order is display order.
#[derive(Debug, Clone, Serialize)]
pub struct Conversation {
    messages: Vec<Message>,
    state: ChatState,
}

impl Conversation {
    pub fn new(welcome: Message) -> Self {
        Self {
            messages: vec![welcome],
            state: ChatState::default(),
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn state(&self) -> ChatState {
        self.state
    }

    #[allow(dead_code)] // API completeness
    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    pub(crate) fn set_state(&mut self, state: ChatState) {
        self.state = state;
    }

    pub(crate) fn append(&mut self, messages: impl IntoIterator<Item = Message>) {
        self.messages.extend(messages);
    }
}
