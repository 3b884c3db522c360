//! Pure state transition function for the chat
//!
//! Given the same state and event this always produces the same state and
//! effect list; turn ids and timestamps are the only values minted here.

use super::{ChatPhase, ChatState, Effect, Event, Message};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ChatState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ChatState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    /// Validation failure; the send is dropped without touching the transcript
    #[error("Message is empty")]
    BlankInput,
    #[error("Still waiting for the previous reply")]
    Busy,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

pub fn transition(state: &ChatState, event: Event) -> Result<TransitionResult, TransitionError> {
    match (state.phase, event) {
        // ============================================================
        // User messages
        // ============================================================
        (_, Event::UserMessage { text }) if text.trim().is_empty() => {
            Err(TransitionError::BlankInput)
        }

        (ChatPhase::Idle, Event::UserMessage { text }) => {
            let new_state = ChatState {
                phase: ChatPhase::AwaitingReply,
                ..*state
            };
            Ok(TransitionResult::new(new_state)
                .with_effect(Effect::append(Message::user(text.clone())))
                .with_effect(Effect::NotifyState)
                .with_effect(Effect::RequestReply { prompt: text }))
        }

        (ChatPhase::AwaitingReply, Event::UserMessage { .. }) => Err(TransitionError::Busy),

        // ============================================================
        // Reply resolution
        // ============================================================
        (ChatPhase::AwaitingReply, Event::ReplyReady { reply }) => {
            let offer_connect = reply.offer_connect;
            let mut messages = vec![Message::assistant(reply.text)];
            if offer_connect {
                messages.push(Message::connect_prompt());
            }
            Ok(TransitionResult::new(ChatState {
                phase: ChatPhase::Idle,
                ..*state
            })
            .with_effect(Effect::AppendMessages { messages })
            .with_effect(Effect::NotifyState))
        }

        (ChatPhase::AwaitingReply, Event::ReplyFailed { kind }) => {
            Ok(TransitionResult::new(ChatState {
                phase: ChatPhase::Idle,
                ..*state
            })
            .with_effect(Effect::append(Message::reply_failed(kind)))
            .with_effect(Effect::NotifyState))
        }

        // ============================================================
        // Call overlay (orthogonal to the reply lifecycle)
        // ============================================================
        (_, Event::OpenCall) if state.call_open => Ok(TransitionResult::new(*state)),

        (_, Event::OpenCall) => Ok(TransitionResult::new(ChatState {
            call_open: true,
            ..*state
        })
        .with_effect(Effect::StartCall)
        .with_effect(Effect::NotifyState)),

        (_, Event::CallClosed) => Ok(TransitionResult::new(ChatState {
            call_open: false,
            ..*state
        })
        .with_effect(Effect::NotifyState)),

        // ============================================================
        // Invalid Transitions
        // ============================================================
        (phase, event) => Err(TransitionError::InvalidTransition(format!(
            "No transition from {phase:?} with event {event:?}"
        ))),
    }
}
