//! Reply selection for user chat turns
//!
//! Vancomycin/Zosyn line-compatibility questions are answered with a fixed
//! clinical-safety statement and never reach the completion endpoint.
//! Everything else is forwarded verbatim.

use crate::llm::LlmError;
use crate::runtime::CompletionClient;

/// Answer for Vancomycin + Zosyn line-compatibility questions. Reproduced
/// exactly; do not paraphrase.
pub const SAFETY_FACT: &str = "No. Vancomycin and Zosyn (piperacillin/tazobactam) are \
incompatible and should never be run in the same IV line due to the risk of precipitation. \
Use separate IV lines, or if the same line must be used, flush it thoroughly between \
medications according to your facility's protocol.";

/// Follow-up turn appended after every reply that offers a preceptor call
pub const CONNECT_PROMPT: &str = "Need more information?";

const DRUG_PAIR: [&str; 2] = ["vancomycin", "zosyn"];

const CONTEXT_TERMS: &[&str] = &[
    "line",
    "lines",
    "iv",
    "ivs",
    "compatible",
    "compatibility",
    "incompatible",
    "incompatibility",
    "y-site",
];

/// A selected reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub offer_connect: bool,
}

impl Reply {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            offer_connect: true,
        }
    }
}

/// Chooses between the canned safety fact and the completion client
pub struct ReplySelector<C> {
    client: C,
}

impl<C: CompletionClient> ReplySelector<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Select the reply for a user turn. Completion failures propagate.
    pub async fn select_reply(&self, user_text: &str) -> Result<Reply, LlmError> {
        if let Some(fact) = canned_reply(user_text) {
            tracing::debug!("Answering with canned safety fact");
            return Ok(Reply::new(fact));
        }

        let text = self.client.complete(user_text).await?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(LlmError::malformed("Completion returned no text"));
        }
        Ok(Reply::new(trimmed))
    }
}

/// The fixed reply for `user_text`, if it asks about running the drug pair
/// together.
pub fn canned_reply(user_text: &str) -> Option<&'static str> {
    let normalized = user_text.to_lowercase();

    if !DRUG_PAIR.iter().all(|drug| normalized.contains(drug)) {
        return None;
    }

    let has_context = normalized
        .split(|c: char| !(c.is_alphanumeric() || c == '-'))
        .filter(|token| !token.is_empty())
        .any(|token| {
            CONTEXT_TERMS.contains(&token)
                || token.split('-').any(|part| CONTEXT_TERMS.contains(&part))
        });

    has_context.then_some(SAFETY_FACT)
}
