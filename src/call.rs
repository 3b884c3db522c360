//! Simulated preceptor video call
//!
//! A session walks connecting, live, summary and closed. Every timer the
//! session needs is requested through [`Effect::ScheduleTimer`] and torn
//! down with [`Effect::CancelAllTimers`] when the call ends.

mod effect;
mod event;
pub mod script;
mod state;
mod transition;


pub use effect::{CallTimer, Effect};
pub use event::Event;
pub use state::{CallPhase, CallSession, Participant, TranscriptLine};
pub use transition::{start, transition, TransitionResult};
