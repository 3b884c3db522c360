//! Text-completion provider abstraction
//!
//! Provides a common interface over the external completion endpoint.

mod error;
mod openai;
mod types;

pub use error::{LlmError, LlmErrorKind};
pub use openai::OpenAICompletionService;
pub use types::{CompletionRequest, CompletionResponse, Usage};

use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for completion providers
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Make a completion request
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// Get the model ID
    fn model_id(&self) -> &str;
}

/// Logging wrapper for completion services
pub struct LoggingService {
    inner: Arc<dyn CompletionService>,
    model_id: String,
}

impl LoggingService {
    pub fn new(inner: Arc<dyn CompletionService>) -> Self {
        let model_id = inner.model_id().to_string();
        Self { inner, model_id }
    }
}

#[async_trait]
impl CompletionService for LoggingService {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let start = std::time::Instant::now();
        let result = self.inner.complete(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(response) => {
                tracing::info!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    prompt_tokens = response.usage.prompt_tokens,
                    completion_tokens = response.usage.completion_tokens,
                    finish_reason = ?response.finish_reason,
                    "Completion request finished"
                );
            }
            Err(e) => {
                tracing::error!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    status = ?e.status,
                    transport = e.kind.is_transport(),
                    "Completion request failed"
                );
            }
        }

        result
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
