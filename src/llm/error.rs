//! Completion error types

use thiserror::Error;

/// Completion error with classification
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct LlmError {
    pub kind: LlmErrorKind,
    pub message: String,
    /// HTTP status of the failed response, when one was received
    pub status: Option<u16>,
}

impl LlmError {
    pub fn new(kind: LlmErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(LlmErrorKind::Transport, message)
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(LlmErrorKind::Auth, message)
    }

    pub fn rate_limit(message: impl Into<String>) -> Self {
        Self::new(LlmErrorKind::RateLimit, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(LlmErrorKind::InvalidRequest, message)
    }

    pub fn server_error(message: impl Into<String>) -> Self {
        Self::new(LlmErrorKind::ServerError, message)
    }

    pub fn api(message: impl Into<String>) -> Self {
        Self::new(LlmErrorKind::Api, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(LlmErrorKind::Malformed, message)
    }

    /// Classify a non-success HTTP response from the completion endpoint.
    pub fn from_status(status: u16, message: &str) -> Self {
        let err = match status {
            401 | 403 => Self::auth(format!("Authentication failed: {message}")),
            429 => Self::rate_limit(format!("Rate limit exceeded: {message}")),
            400 => Self::invalid_request(format!("Invalid request: {message}")),
            500..=599 => Self::server_error(format!("Server error: {message}")),
            _ => Self::api(format!("HTTP {status}: {message}")),
        };
        err.with_status(status)
    }
}

/// Error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmErrorKind {
    /// Endpoint unreachable, timeouts, broken connections
    Transport,
    /// Authentication failed (401, 403) or no credential configured
    Auth,
    /// Rate limited (429)
    RateLimit,
    /// Bad request (400)
    InvalidRequest,
    /// Server error (5xx)
    ServerError,
    /// Any other non-success response
    Api,
    /// Success status but the body could not be used
    Malformed,
}

impl LlmErrorKind {
    pub fn is_transport(self) -> bool {
        matches!(self, Self::Transport)
    }

    /// The endpoint answered, but not with a usable completion
    #[allow(dead_code)] // API completeness
    pub fn is_api(self) -> bool {
        matches!(
            self,
            Self::Auth | Self::RateLimit | Self::InvalidRequest | Self::ServerError | Self::Api
        )
    }
}
