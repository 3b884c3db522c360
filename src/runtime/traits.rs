//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the executor with mock implementations.

use super::RuntimeEvent;
use crate::call::CallTimer;
use crate::llm::{CompletionRequest, CompletionService, LlmError};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Client for turning a prompt into generated text
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

/// A timer the call session asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerRequest {
    pub timer: CallTimer,
    pub delay: Duration,
    /// Fire every `delay` until cancelled instead of once
    pub repeat: bool,
    /// Call session the timer belongs to
    pub session: u64,
}

impl TimerRequest {
    /// The event delivered each time the timer fires
    pub fn event(&self) -> RuntimeEvent {
        RuntimeEvent::Timer {
            timer: self.timer,
            session: self.session,
        }
    }
}

/// Schedules timer events back into the runtime's channel
pub trait Scheduler: Send + Sync {
    /// Start a timer. Cancelling the returned token stops it; an already
    /// queued event may still arrive.
    fn schedule(&self, request: TimerRequest, tx: mpsc::Sender<RuntimeEvent>)
        -> CancellationToken;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: CompletionClient + ?Sized> CompletionClient for Arc<T> {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        (**self).complete(prompt).await
    }
}

impl<T: Scheduler + ?Sized> Scheduler for Arc<T> {
    fn schedule(
        &self,
        request: TimerRequest,
        tx: mpsc::Sender<RuntimeEvent>,
    ) -> CancellationToken {
        (**self).schedule(request, tx)
    }
}

// ============================================================================
// Production Adapters
// ============================================================================

/// Adapter to use a `CompletionService` as `CompletionClient`
pub struct ServiceCompletionClient {
    service: Arc<dyn CompletionService>,
    max_tokens: u32,
}

impl ServiceCompletionClient {
    pub fn new(service: Arc<dyn CompletionService>, max_tokens: u32) -> Self {
        Self {
            service,
            max_tokens,
        }
    }
}

#[async_trait]
impl CompletionClient for ServiceCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let request = CompletionRequest::new(prompt).with_max_tokens(self.max_tokens);
        let response = self.service.complete(&request).await?;
        Ok(response.text)
    }
}
