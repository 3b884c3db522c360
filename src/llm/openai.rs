//! `OpenAI` legacy text-completions provider

use super::types::{CompletionRequest, CompletionResponse, Usage};
use super::{CompletionService, LlmError};
use crate::config::CompletionConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Service for the `v1/completions` endpoint
pub struct OpenAICompletionService {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
    model_id: String,
    default_max_tokens: u32,
}

impl OpenAICompletionService {
    pub fn new(config: &CompletionConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::transport(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            endpoint: format!("{}/completions", config.base_url.trim_end_matches('/')),
            model_id: config.model.clone(),
            default_max_tokens: config.max_tokens,
        })
    }

    fn translate_request(&self, request: &CompletionRequest) -> OpenAICompletionRequest {
        OpenAICompletionRequest {
            model: self.model_id.clone(),
            prompt: request.prompt.clone(),
            max_tokens: request.max_tokens.unwrap_or(self.default_max_tokens),
        }
    }

    pub(crate) fn normalize_response(
        resp: OpenAICompletionResponse,
    ) -> Result<CompletionResponse, LlmError> {
        let choice = resp
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::malformed("No choices in response"))?;

        let usage = resp.usage.map_or_else(Usage::default, |u| Usage {
            prompt_tokens: u64::from(u.prompt_tokens),
            completion_tokens: u64::from(u.completion_tokens),
        });

        Ok(CompletionResponse {
            text: choice.text,
            finish_reason: choice.finish_reason,
            usage,
        })
    }

    /// Turn a non-success body into a classified error
    pub(crate) fn error_from_body(status: u16, body: &str) -> LlmError {
        match serde_json::from_str::<OpenAIErrorResponse>(body) {
            Ok(error_resp) => LlmError::from_status(status, &error_resp.error.message),
            Err(_) => LlmError::from_status(status, body),
        }
    }
}

#[async_trait]
impl CompletionService for OpenAICompletionService {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(LlmError::auth("No completion API key configured"));
        };

        let body = self.translate_request(request);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::transport(format!("Request timeout: {e}"))
                } else if e.is_connect() {
                    LlmError::transport(format!("Connection failed: {e}"))
                } else {
                    LlmError::transport(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::transport(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(Self::error_from_body(status.as_u16(), &text));
        }

        let parsed: OpenAICompletionResponse = serde_json::from_str(&text).map_err(|e| {
            LlmError::malformed(format!("Failed to parse response: {e} - body: {text}"))
        })?;

        Self::normalize_response(parsed)
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

// OpenAI API types

#[derive(Debug, Serialize)]
pub(crate) struct OpenAICompletionRequest {
    model: String,
    prompt: String,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenAICompletionResponse {
    choices: Vec<OpenAIChoice>,
    #[serde(default)]
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    text: String,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[allow(clippy::struct_field_names)]
struct OpenAIUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct OpenAIErrorResponse {
    error: OpenAIError,
}

#[derive(Debug, Deserialize)]
struct OpenAIError {
    message: String,
}
