//! The completion capability contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use frontdesk_core::error::Result;

/// Maximum keywords returned by `extract_keywords`.
pub const MAX_KEYWORDS: usize = 5;

/// Speaker role for a completion message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// One message of a completion conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionMessage {
    pub role: MessageRole,
    pub content: String,
}

impl CompletionMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// External text-completion capability.
///
/// Calls are bounded by the implementation's configured timeout and are
/// never retried here; a failed or expired call surfaces as
/// `FrontdeskError::Completion` and the caller decides the fallback
/// (the agent escalates, the knowledge engine stores without keywords).
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Generate a completion for an ordered conversation.
    async fn complete(
        &self,
        messages: &[CompletionMessage],
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String>;

    /// Extract up to [`MAX_KEYWORDS`] keywords from free text.
    async fn extract_keywords(&self, text: &str) -> Result<Vec<String>>;
}

/// Parse a comma-separated keyword reply into at most [`MAX_KEYWORDS`]
/// trimmed, lowercased, non-empty keywords.
pub(crate) fn parse_keyword_reply(reply: &str) -> Vec<String> {
    reply
        .split(',')
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .take(MAX_KEYWORDS)
        .collect()
}
