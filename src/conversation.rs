//! Chat conversation state machine
//!
//! Elm-style: a pure transition over [`ChatState`] emits effects, and the
//! runtime applies them to the owned [`Conversation`].

mod effect;
pub mod event;
mod message;
pub mod state;
pub(crate) mod transition;


pub use effect::Effect;
pub use event::Event;
pub use message::{Message, Role};
pub use state::{ChatPhase, ChatState, Conversation};
pub use transition::{transition, TransitionError};
