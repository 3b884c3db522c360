//! Effects produced by call session transitions

use super::event::Event;
use super::state::Participant;
use serde::Serialize;
use std::time::Duration;

/// The independent timers a session can have pending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CallTimer {
    Progress,
    Connect,
    Transcript,
    CounterpartFeed,
    SelfFeed,
}

impl CallTimer {
    /// Event delivered each time the timer fires
    pub fn event(self) -> Event {
        match self {
            CallTimer::Progress => Event::ProgressTick,
            CallTimer::Connect => Event::ConnectElapsed,
            CallTimer::Transcript => Event::TranscriptTick,
            CallTimer::CounterpartFeed => Event::FeedRotate {
                participant: Participant::Counterpart,
            },
            CallTimer::SelfFeed => Event::FeedRotate {
                participant: Participant::Local,
            },
        }
    }
}

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start a timer; `repeat` timers fire every `delay` until cancelled
    ScheduleTimer {
        timer: CallTimer,
        delay: Duration,
        repeat: bool,
    },

    CancelTimer { timer: CallTimer },

    CancelAllTimers,

    /// Broadcast the session to the view
    NotifyState,

    /// Hand control to the learning resources panel
    ShowLearningResources,

    /// Session destroyed; the conversation clears its call-open flag
    SessionClosed,
}

impl Effect {
    pub fn every(timer: CallTimer, delay: Duration) -> Self {
        Effect::ScheduleTimer {
            timer,
            delay,
            repeat: true,
        }
    }

    pub fn once(timer: CallTimer, delay: Duration) -> Self {
        Effect::ScheduleTimer {
            timer,
            delay,
            repeat: false,
        }
    }
}
