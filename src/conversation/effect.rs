//! Effects produced by conversation transitions

use super::message::Message;

/// Effects to be executed after state transition
#[derive(Debug, Clone)]
pub enum Effect {
    /// Append turns to the transcript in one step; observers never see a
    /// partial batch
    AppendMessages { messages: Vec<Message> },

    /// Resolve a reply for the prompt
    RequestReply { prompt: String },

    /// Create the call session overlay
    StartCall,

    /// Broadcast the new chat state
    NotifyState,
}

impl Effect {
    pub fn append(message: Message) -> Self {
        Effect::AppendMessages {
            messages: vec![message],
        }
    }
}
