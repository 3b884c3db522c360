//! Pure state transition function for a call session
//!
//! Timer events that arrive after their phase has passed are accepted as
//! no-ops: a tick can already be queued when the timer is cancelled.

use super::script::{COUNTERPART_CLIPS, SELF_CLIPS, TRANSCRIPT_SCRIPT};
use super::{CallPhase, CallSession, CallTimer, Effect, Event, Participant, TranscriptLine};
use crate::config::CallTimings;
use chrono::Utc;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_session: CallSession,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(session: CallSession) -> Self {
        Self {
            new_session: session,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Open a new session: progress and connect timers start together and run
/// independently.
pub fn start(timings: &CallTimings) -> TransitionResult {
    TransitionResult::new(CallSession::default())
        .with_effect(Effect::every(CallTimer::Progress, timings.progress_interval))
        .with_effect(Effect::once(CallTimer::Connect, timings.connect_delay))
        .with_effect(Effect::NotifyState)
}

pub fn transition(
    session: &CallSession,
    timings: &CallTimings,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (session.phase, event) {
        // ============================================================
        // Connecting
        // ============================================================
        (CallPhase::Connecting | CallPhase::Live, Event::ProgressTick) => {
            if session.progress >= 100 {
                return Ok(TransitionResult::new(session.clone())
                    .with_effect(Effect::CancelTimer {
                        timer: CallTimer::Progress,
                    }));
            }
            let progress = session
                .progress
                .saturating_add(timings.progress_step)
                .min(100);
            let mut result = TransitionResult::new(CallSession {
                progress,
                ..session.clone()
            });
            if progress == 100 {
                result = result.with_effect(Effect::CancelTimer {
                    timer: CallTimer::Progress,
                });
            }
            Ok(result.with_effect(Effect::NotifyState))
        }

        (CallPhase::Connecting, Event::ConnectElapsed) => Ok(TransitionResult::new(CallSession {
            phase: CallPhase::Live,
            ..session.clone()
        })
        .with_effect(Effect::every(
            CallTimer::Transcript,
            timings.transcript_interval,
        ))
        .with_effect(Effect::every(
            CallTimer::CounterpartFeed,
            timings.counterpart_feed_interval,
        ))
        .with_effect(Effect::every(CallTimer::SelfFeed, timings.self_feed_interval))
        .with_effect(Effect::NotifyState)),

        // ============================================================
        // Live
        // ============================================================
        (CallPhase::Live, Event::TranscriptTick) => {
            let Some(&(speaker, text)) = TRANSCRIPT_SCRIPT.get(session.script_cursor) else {
                return Ok(TransitionResult::new(session.clone()).with_effect(
                    Effect::CancelTimer {
                        timer: CallTimer::Transcript,
                    },
                ));
            };

            let mut next = session.clone();
            next.transcript.push(TranscriptLine {
                id: session.script_cursor,
                speaker,
                text: text.to_string(),
                timestamp: Utc::now(),
            });
            next.script_cursor += 1;

            let exhausted = next.script_cursor >= TRANSCRIPT_SCRIPT.len();
            let mut result = TransitionResult::new(next);
            if exhausted {
                result = result.with_effect(Effect::CancelTimer {
                    timer: CallTimer::Transcript,
                });
            }
            Ok(result.with_effect(Effect::NotifyState))
        }

        (CallPhase::Live, Event::FeedRotate { participant }) => {
            let mut next = session.clone();
            match participant {
                Participant::Counterpart => {
                    next.counterpart_clip = (session.counterpart_clip + 1) % COUNTERPART_CLIPS.len();
                }
                Participant::Local => {
                    next.self_clip = (session.self_clip + 1) % SELF_CLIPS.len();
                }
            }
            Ok(TransitionResult::new(next).with_effect(Effect::NotifyState))
        }

        (CallPhase::Live, Event::ToggleMute) => Ok(TransitionResult::new(CallSession {
            muted: !session.muted,
            ..session.clone()
        })
        .with_effect(Effect::NotifyState)),

        (CallPhase::Live, Event::ToggleVideo) => Ok(TransitionResult::new(CallSession {
            video_enabled: !session.video_enabled,
            ..session.clone()
        })
        .with_effect(Effect::NotifyState)),

        (CallPhase::Connecting | CallPhase::Live, Event::EndCall) => {
            Ok(TransitionResult::new(CallSession {
                phase: CallPhase::Summary,
                ..session.clone()
            })
            .with_effect(Effect::CancelAllTimers)
            .with_effect(Effect::NotifyState))
        }

        // ============================================================
        // Summary
        // ============================================================
        (CallPhase::Summary, Event::OpenLearningResources) => {
            Ok(TransitionResult::new(session.clone()).with_effect(Effect::ShowLearningResources))
        }

        (CallPhase::Summary, Event::Close)
        | (CallPhase::Connecting | CallPhase::Live | CallPhase::Summary, Event::Dismiss) => {
            Ok(closed(session))
        }

        // ============================================================
        // Stale timer ticks
        // ============================================================
        (_, event) if event.is_timer() => Ok(TransitionResult::new(session.clone())),

        // ============================================================
        // Invalid Transitions
        // ============================================================
        (phase, event) => Err(TransitionError::InvalidTransition(format!(
            "No transition from {phase:?} with event {event:?}"
        ))),
    }
}

fn closed(session: &CallSession) -> TransitionResult {
    TransitionResult::new(CallSession {
        phase: CallPhase::Closed,
        transcript: Vec::new(),
        ..session.clone()
    })
    .with_effect(Effect::CancelAllTimers)
    .with_effect(Effect::SessionClosed)
}
