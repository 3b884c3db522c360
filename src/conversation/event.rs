//! Events that can occur in a conversation

use crate::llm::LlmErrorKind;
use crate::reply::Reply;

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    UserMessage {
        text: String,
    },
    OpenCall,

    // Reply events
    ReplyReady {
        reply: Reply,
    },
    ReplyFailed {
        kind: LlmErrorKind,
    },

    // Call session events
    CallClosed,
}
