//! Call session state types

use super::script::{
    COUNTERPART_CLIPS, KEY_POINTS, PRECEPTOR_NAME, RECOMMENDATIONS, SELF_CLIPS,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of the call overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CallPhase {
    /// Progress ticking, waiting for the connect timer
    #[default]
    Connecting,

    /// Media playing, scripted transcript advancing
    Live,

    /// Call ended; transcript and summary on screen
    Summary,

    /// Overlay dismissed. Terminal.
    Closed,
}

impl CallPhase {
    #[allow(dead_code)] // API completeness
    pub fn is_active(self) -> bool {
        matches!(self, CallPhase::Connecting | CallPhase::Live)
    }
}

/// One side of the call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Participant {
    /// The preceptor
    Counterpart,
    /// The user
    #[serde(rename = "self")]
    Local,
}

impl Participant {
    pub fn label(self) -> &'static str {
        match self {
            Participant::Counterpart => "Nurse:",
            Participant::Local => "You:",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptLine {
    pub id: usize,
    pub speaker: Participant,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// One instantiation of the call overlay, from connect to close
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallSession {
    pub phase: CallPhase,
    /// Connection progress in percent, never above 100
    pub progress: u8,
    pub muted: bool,
    pub video_enabled: bool,
    pub transcript: Vec<TranscriptLine>,
    /// Next line of the script to play
    pub script_cursor: usize,
    pub counterpart_clip: usize,
    pub self_clip: usize,
}

impl Default for CallSession {
    fn default() -> Self {
        Self {
            phase: CallPhase::Connecting,
            progress: 0,
            muted: false,
            video_enabled: true,
            transcript: Vec::new(),
            script_cursor: 0,
            counterpart_clip: 0,
            self_clip: 0,
        }
    }
}

impl CallSession {
    pub fn title(&self) -> String {
        match self.phase {
            CallPhase::Connecting => "Connecting to Preceptor".to_string(),
            CallPhase::Live => format!("Connected with Preceptor {PRECEPTOR_NAME}"),
            CallPhase::Summary | CallPhase::Closed => "Call Summary".to_string(),
        }
    }

    /// Status text shown under the connecting progress bar
    pub fn status_line(&self) -> &'static str {
        match self.progress {
            0..=49 => "Initializing video stream...",
            50..=74 => "Connecting to available preceptor...",
            _ => "Almost ready...",
        }
    }

    pub fn counterpart_clip_src(&self) -> &'static str {
        COUNTERPART_CLIPS[self.counterpart_clip % COUNTERPART_CLIPS.len()]
    }

    /// `None` while the camera is off
    pub fn self_clip_src(&self) -> Option<&'static str> {
        self.video_enabled
            .then(|| SELF_CLIPS[self.self_clip % SELF_CLIPS.len()])
    }

    pub fn summary(&self) -> Option<CallSummary<'_>> {
        (self.phase == CallPhase::Summary).then(|| CallSummary {
            key_points: KEY_POINTS,
            recommendations: RECOMMENDATIONS,
            transcript: &self.transcript,
        })
    }
}

/// What the summary view shows
#[derive(Debug, Clone, Serialize)]
pub struct CallSummary<'a> {
    pub key_points: &'static [&'static str],
    pub recommendations: &'static [&'static str],
    pub transcript: &'a [TranscriptLine],
}
