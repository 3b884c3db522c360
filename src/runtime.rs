//! Runtime driving the chat and the call session
//!
//! Owns both state machines, executes the effects their transitions emit and
//! broadcasts [`UiEvent`]s to whatever front-end is subscribed.

mod executor;
mod scheduler;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::ChatRuntime;
pub use scheduler::TokioScheduler;
pub use traits::*;

use crate::call::{self, CallPhase, CallSession, CallTimer, TranscriptLine};
use crate::conversation::{self, ChatState, Message};
use crate::resources::LearningResource;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;

/// Type alias for production runtime with concrete implementations
pub type ProductionRuntime = ChatRuntime<ServiceCompletionClient, TokioScheduler>;

/// Everything the runtime reacts to, from the user or from its own timers
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    Chat(conversation::Event),
    Call(call::Event),
    /// A scheduled timer fired for the call session numbered `session`
    Timer {
        timer: CallTimer,
        session: u64,
    },
    CloseLearningResources,
}

/// Events sent to UI subscribers
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiEvent {
    Init {
        messages: Vec<Message>,
        state: ChatState,
    },
    MessagesAppended {
        messages: Vec<Message>,
    },
    ChatStateChanged {
        state: ChatState,
    },
    CallUpdated {
        call: CallView,
    },
    CallClosed,
    LearningResources {
        resources: Vec<LearningResource>,
    },
    LearningResourcesClosed,
    Error {
        message: String,
    },
}

/// Render-ready snapshot of a call session
#[derive(Debug, Clone, Serialize)]
pub struct CallView {
    pub phase: CallPhase,
    pub title: String,
    pub status_line: &'static str,
    pub progress: u8,
    pub muted: bool,
    pub video_enabled: bool,
    pub counterpart_clip: &'static str,
    pub self_clip: Option<&'static str>,
    pub transcript: Vec<TranscriptLine>,
    pub summary: Option<SummaryView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryView {
    pub key_points: &'static [&'static str],
    pub recommendations: &'static [&'static str],
    pub community_url: String,
}

impl CallView {
    pub fn new(session: &CallSession, community_url: &str) -> Self {
        Self {
            phase: session.phase,
            title: session.title(),
            status_line: session.status_line(),
            progress: session.progress,
            muted: session.muted,
            video_enabled: session.video_enabled,
            counterpart_clip: session.counterpart_clip_src(),
            self_clip: session.self_clip_src(),
            transcript: session.transcript.clone(),
            summary: session.summary().map(|summary| SummaryView {
                key_points: summary.key_points,
                recommendations: summary.recommendations,
                community_url: community_url.to_string(),
            }),
        }
    }
}

#[derive(Debug, Error)]
#[error("Runtime has stopped")]
pub struct RuntimeStopped;

/// Handle to interact with a running [`ChatRuntime`]
#[derive(Clone)]
pub struct RuntimeHandle {
    event_tx: mpsc::Sender<RuntimeEvent>,
    broadcast_tx: broadcast::Sender<UiEvent>,
    shutdown: CancellationToken,
}

impl RuntimeHandle {
    pub fn subscribe(&self) -> broadcast::Receiver<UiEvent> {
        self.broadcast_tx.subscribe()
    }

    pub async fn send_message(&self, text: impl Into<String>) -> Result<(), RuntimeStopped> {
        self.send(RuntimeEvent::Chat(conversation::Event::UserMessage {
            text: text.into(),
        }))
        .await
    }

    /// The "Connect" affordance on the prompt-to-connect turn
    pub async fn connect(&self) -> Result<(), RuntimeStopped> {
        self.send(RuntimeEvent::Chat(conversation::Event::OpenCall))
            .await
    }

    pub async fn toggle_mute(&self) -> Result<(), RuntimeStopped> {
        self.send(RuntimeEvent::Call(call::Event::ToggleMute)).await
    }

    pub async fn toggle_video(&self) -> Result<(), RuntimeStopped> {
        self.send(RuntimeEvent::Call(call::Event::ToggleVideo)).await
    }

    pub async fn end_call(&self) -> Result<(), RuntimeStopped> {
        self.send(RuntimeEvent::Call(call::Event::EndCall)).await
    }

    pub async fn open_learning_resources(&self) -> Result<(), RuntimeStopped> {
        self.send(RuntimeEvent::Call(call::Event::OpenLearningResources))
            .await
    }

    pub async fn close_learning_resources(&self) -> Result<(), RuntimeStopped> {
        self.send(RuntimeEvent::CloseLearningResources).await
    }

    /// Close button on the call summary
    pub async fn close_call(&self) -> Result<(), RuntimeStopped> {
        self.send(RuntimeEvent::Call(call::Event::Close)).await
    }

    /// Overlay close button; tears the call down from any phase
    pub async fn dismiss_call(&self) -> Result<(), RuntimeStopped> {
        self.send(RuntimeEvent::Call(call::Event::Dismiss)).await
    }

    /// Stop the runtime, cancelling every timer and any pending reply
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    async fn send(&self, event: RuntimeEvent) -> Result<(), RuntimeStopped> {
        if self.shutdown.is_cancelled() {
            return Err(RuntimeStopped);
        }
        self.event_tx.send(event).await.map_err(|_| RuntimeStopped)
    }
}
