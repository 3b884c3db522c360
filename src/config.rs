//! Application configuration
//!
//! Everything is read once at startup by [`AppConfig::from_env`] and passed
//! down explicitly; nothing below `main` looks at the environment.

use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo-instruct";
pub const DEFAULT_MAX_TOKENS: u32 = 100;
pub const DEFAULT_COMMUNITY_URL: &str = "https://nursecommunity.pocketpreceptor.com";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?} ({reason})")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Settings for the external completion endpoint
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub base_url: String,
    /// Bearer credential; requests fail with an auth error when absent
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Timing of the chat reply simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatTimings {
    /// Applied to every resolved reply before it is appended
    pub reply_delay: Duration,
}

impl Default for ChatTimings {
    fn default() -> Self {
        Self {
            reply_delay: Duration::from_millis(1000),
        }
    }
}

/// Timing of the simulated video call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallTimings {
    pub progress_interval: Duration,
    pub progress_step: u8,
    /// Connecting -> Live, independent of the progress ticker
    pub connect_delay: Duration,
    pub transcript_interval: Duration,
    pub counterpart_feed_interval: Duration,
    pub self_feed_interval: Duration,
}

impl Default for CallTimings {
    fn default() -> Self {
        Self {
            progress_interval: Duration::from_millis(500),
            progress_step: 25,
            connect_delay: Duration::from_millis(2000),
            transcript_interval: Duration::from_millis(3000),
            counterpart_feed_interval: Duration::from_secs(8),
            self_feed_interval: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub completion: CompletionConfig,
    pub chat: ChatTimings,
    pub call: CallTimings,
    pub community_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            completion: CompletionConfig::default(),
            chat: ChatTimings::default(),
            call: CallTimings::default(),
            community_url: DEFAULT_COMMUNITY_URL.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        config.completion.api_key = lookup("OPENAI_API_KEY").filter(|k| !k.trim().is_empty());
        if let Some(url) = lookup("PRECEPTOR_COMPLETIONS_BASE_URL") {
            config.completion.base_url = url;
        }
        if let Some(model) = lookup("PRECEPTOR_MODEL") {
            config.completion.model = model;
        }
        if let Some(raw) = lookup("PRECEPTOR_MAX_TOKENS") {
            config.completion.max_tokens = parse_number("PRECEPTOR_MAX_TOKENS", &raw)?;
        }
        if let Some(raw) = lookup("PRECEPTOR_REPLY_DELAY_MS") {
            let ms: u64 = parse_number("PRECEPTOR_REPLY_DELAY_MS", &raw)?;
            config.chat.reply_delay = Duration::from_millis(ms);
        }
        if let Some(url) = lookup("PRECEPTOR_COMMUNITY_URL") {
            config.community_url = url;
        }

        Ok(config)
    }
}

fn parse_number<T>(name: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidValue {
            name,
            value: raw.to_string(),
            reason: e.to_string(),
        })
}
