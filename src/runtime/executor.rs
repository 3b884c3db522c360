//! Chat runtime executor

use super::traits::{CompletionClient, Scheduler, TimerRequest};
use super::{CallView, RuntimeEvent, RuntimeHandle, UiEvent};

use crate::call::{self, CallSession, CallTimer};
use crate::config::{AppConfig, CallTimings};
use crate::conversation::{self, Conversation, Message, TransitionError};
use crate::reply::ReplySelector;
use crate::resources::LearningResourcePanel;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;

/// Generic chat runtime that can work with any completion client and scheduler
pub struct ChatRuntime<C, S>
where
    C: CompletionClient + 'static,
    S: Scheduler,
{
    conversation: Conversation,
    call: Option<CallSession>,
    /// Number of the latest call session; timers carry it back
    call_session: u64,
    resources: Option<LearningResourcePanel>,
    selector: Arc<ReplySelector<C>>,
    scheduler: S,
    call_timings: CallTimings,
    reply_delay: Duration,
    community_url: String,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    event_tx: mpsc::Sender<RuntimeEvent>,
    broadcast_tx: broadcast::Sender<UiEvent>,
    /// One token per pending call timer
    timers: HashMap<CallTimer, CancellationToken>,
    /// Token to cancel the in-flight reply
    reply_cancel_token: Option<CancellationToken>,
    shutdown: CancellationToken,
}

impl<C, S> ChatRuntime<C, S>
where
    C: CompletionClient + 'static,
    S: Scheduler,
{
    pub fn new(config: &AppConfig, client: C, scheduler: S) -> (Self, RuntimeHandle) {
        let (event_tx, event_rx) = mpsc::channel(64);
        let (broadcast_tx, _) = broadcast::channel(128);
        let shutdown = CancellationToken::new();

        let handle = RuntimeHandle {
            event_tx: event_tx.clone(),
            broadcast_tx: broadcast_tx.clone(),
            shutdown: shutdown.clone(),
        };

        let runtime = Self {
            conversation: Conversation::new(Message::welcome(&config.community_url)),
            call: None,
            call_session: 0,
            resources: None,
            selector: Arc::new(ReplySelector::new(client)),
            scheduler,
            call_timings: config.call,
            reply_delay: config.chat.reply_delay,
            community_url: config.community_url.clone(),
            event_rx,
            event_tx,
            broadcast_tx,
            timers: HashMap::new(),
            reply_cancel_token: None,
            shutdown,
        };

        (runtime, handle)
    }

    pub async fn run(mut self) {
        tracing::info!("Starting chat runtime");

        let _ = self.broadcast_tx.send(UiEvent::Init {
            messages: self.conversation.messages().to_vec(),
            state: self.conversation.state(),
        });

        loop {
            tokio::select! {
                biased;
                () = self.shutdown.cancelled() => break,
                Some(event) = self.event_rx.recv() => self.process_event(event),
                else => break,
            }
        }

        self.cancel_all_timers();
        if let Some(token) = self.reply_cancel_token.take() {
            token.cancel();
        }
        tracing::info!(
            messages = self.conversation.messages().len(),
            "Chat runtime stopped"
        );
    }

    fn process_event(&mut self, event: RuntimeEvent) {
        match event {
            RuntimeEvent::Chat(event) => self.handle_chat_event(event),
            RuntimeEvent::Call(event) => self.handle_call_event(event),
            RuntimeEvent::Timer { timer, session } => self.handle_timer(timer, session),
            RuntimeEvent::CloseLearningResources => {
                if let Some(panel) = self.resources.take() {
                    panel.close();
                    let _ = self.broadcast_tx.send(UiEvent::LearningResourcesClosed);
                }
            }
        }
    }

    // ========================================================================
    // Chat
    // ========================================================================

    fn handle_chat_event(&mut self, event: conversation::Event) {
        let result = match conversation::transition(&self.conversation.state(), event) {
            Ok(r) => r,
            Err(TransitionError::BlankInput) => {
                tracing::debug!("Ignoring blank message");
                return;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Rejected chat event");
                let _ = self.broadcast_tx.send(UiEvent::Error {
                    message: e.to_string(),
                });
                return;
            }
        };

        self.conversation.set_state(result.new_state);
        for effect in result.effects {
            self.execute_chat_effect(effect);
        }
    }

    fn execute_chat_effect(&mut self, effect: conversation::Effect) {
        match effect {
            conversation::Effect::AppendMessages { messages } => {
                self.conversation.append(messages.iter().cloned());
                let _ = self
                    .broadcast_tx
                    .send(UiEvent::MessagesAppended { messages });
            }

            conversation::Effect::RequestReply { prompt } => self.spawn_reply(prompt),

            conversation::Effect::StartCall => self.start_call(),

            conversation::Effect::NotifyState => {
                let _ = self.broadcast_tx.send(UiEvent::ChatStateChanged {
                    state: self.conversation.state(),
                });
            }
        }
    }

    fn spawn_reply(&mut self, prompt: String) {
        let cancel_token = CancellationToken::new();
        if let Some(previous) = self.reply_cancel_token.replace(cancel_token.clone()) {
            previous.cancel();
        }

        let selector = self.selector.clone();
        let event_tx = self.event_tx.clone();
        let delay = self.reply_delay;

        tokio::spawn(async move {
            tracing::info!(prompt_len = prompt.len(), "Selecting reply (background)");

            let outcome = tokio::select! {
                biased;

                () = cancel_token.cancelled() => {
                    tracing::info!("Reply cancelled");
                    return;
                }

                outcome = async {
                    let outcome = selector.select_reply(&prompt).await;
                    tokio::time::sleep(delay).await;
                    outcome
                } => outcome,
            };

            let event = match outcome {
                Ok(reply) => conversation::Event::ReplyReady { reply },
                Err(e) => {
                    tracing::warn!(error = %e, kind = ?e.kind, "Reply failed");
                    conversation::Event::ReplyFailed { kind: e.kind }
                }
            };
            let _ = event_tx.send(RuntimeEvent::Chat(event)).await;
        });
    }

    // ========================================================================
    // Call
    // ========================================================================

    fn start_call(&mut self) {
        if self.call.is_some() {
            tracing::warn!("Call already in progress");
            return;
        }
        self.call_session += 1;
        tracing::info!(session = self.call_session, "Starting call session");
        let result = call::start(&self.call_timings);
        self.apply_call_result(result);
    }

    fn handle_timer(&mut self, timer: CallTimer, session: u64) {
        if self.call.is_none() || session != self.call_session {
            tracing::debug!(
                ?timer,
                session,
                current = self.call_session,
                "Dropping timer event from another call session"
            );
            return;
        }
        self.handle_call_event(timer.event());
    }

    fn handle_call_event(&mut self, event: call::Event) {
        let Some(session) = &self.call else {
            let _ = self.broadcast_tx.send(UiEvent::Error {
                message: "No call in progress".to_string(),
            });
            return;
        };

        match call::transition(session, &self.call_timings, event) {
            Ok(result) => self.apply_call_result(result),
            Err(e) => {
                tracing::warn!(error = %e, "Rejected call event");
                let _ = self.broadcast_tx.send(UiEvent::Error {
                    message: e.to_string(),
                });
            }
        }
    }

    fn apply_call_result(&mut self, result: call::TransitionResult) {
        self.call = Some(result.new_session);
        for effect in result.effects {
            self.execute_call_effect(effect);
        }
    }

    fn execute_call_effect(&mut self, effect: call::Effect) {
        match effect {
            call::Effect::ScheduleTimer {
                timer,
                delay,
                repeat,
            } => {
                tracing::debug!(?timer, ?delay, repeat, "Scheduling timer");
                let token = self.scheduler.schedule(
                    TimerRequest {
                        timer,
                        delay,
                        repeat,
                        session: self.call_session,
                    },
                    self.event_tx.clone(),
                );
                if let Some(previous) = self.timers.insert(timer, token) {
                    previous.cancel();
                }
            }

            call::Effect::CancelTimer { timer } => {
                if let Some(token) = self.timers.remove(&timer) {
                    tracing::debug!(?timer, "Cancelling timer");
                    token.cancel();
                }
            }

            call::Effect::CancelAllTimers => self.cancel_all_timers(),

            call::Effect::NotifyState => {
                if let Some(session) = &self.call {
                    let _ = self.broadcast_tx.send(UiEvent::CallUpdated {
                        call: CallView::new(session, &self.community_url),
                    });
                }
            }

            call::Effect::ShowLearningResources => {
                let panel = LearningResourcePanel::mount();
                let _ = self.broadcast_tx.send(UiEvent::LearningResources {
                    resources: panel.resources().to_vec(),
                });
                self.resources = Some(panel);
            }

            call::Effect::SessionClosed => {
                tracing::info!("Call session closed");
                self.call = None;
                if let Some(panel) = self.resources.take() {
                    panel.close();
                }
                let _ = self.broadcast_tx.send(UiEvent::CallClosed);
                self.handle_chat_event(conversation::Event::CallClosed);
            }
        }
    }

    fn cancel_all_timers(&mut self) {
        for (timer, token) in self.timers.drain() {
            tracing::debug!(?timer, "Cancelling timer");
            token.cancel();
        }
    }
}
