//! Events that can occur during a call session

use super::state::Participant;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // Timer events
    ProgressTick,
    ConnectElapsed,
    TranscriptTick,
    FeedRotate { participant: Participant },

    // User events
    ToggleMute,
    ToggleVideo,
    EndCall,
    OpenLearningResources,
    /// Close button on the summary view
    Close,
    /// Overlay close button, any phase
    Dismiss,
}

impl Event {
    pub fn is_timer(&self) -> bool {
        matches!(
            self,
            Event::ProgressTick
                | Event::ConnectElapsed
                | Event::TranscriptTick
                | Event::FeedRotate { .. }
        )
    }
}
