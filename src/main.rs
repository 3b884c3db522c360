//! Pocket Preceptor chat
//!
//! A nursing-education chat assistant: AI replies, a simulated preceptor
//! video call and a learning-resources panel, driven from the terminal.

mod call;
mod config;
mod console;
mod conversation;
mod llm;
mod reply;
mod resources;
mod runtime;

use config::AppConfig;
use llm::{CompletionService, LoggingService, OpenAICompletionService};
use runtime::{ChatRuntime, ProductionRuntime, ServiceCompletionClient, TokioScheduler};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging; stdout belongs to the console
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "preceptor_chat=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = AppConfig::from_env()?;

    if config.completion.api_key.is_none() {
        tracing::warn!(
            "No completion API key configured. Set OPENAI_API_KEY; only canned replies will work."
        );
    }

    let service: Arc<dyn CompletionService> =
        Arc::new(OpenAICompletionService::new(&config.completion)?);
    let service: Arc<dyn CompletionService> = Arc::new(LoggingService::new(service));
    tracing::info!(
        model = %service.model_id(),
        base_url = %config.completion.base_url,
        "Completion service initialized"
    );

    let client = ServiceCompletionClient::new(service, config.completion.max_tokens);
    let (runtime, handle): (ProductionRuntime, _) =
        ChatRuntime::new(&config, client, TokioScheduler);
    let ui_rx = handle.subscribe();

    let runtime_task = tokio::spawn(runtime.run());
    console::run(&handle, ui_rx, config.community_url.clone()).await?;
    runtime_task.await?;

    Ok(())
}
