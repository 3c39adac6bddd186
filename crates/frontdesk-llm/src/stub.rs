//! Scripted completion client for tests and offline development.
//!
//! Replies are served from a queue (falling back to a fixed default), the
//! keyword set is fixed, and every `complete` call is recorded so tests can
//! assert on the prompts the engines actually sent.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use frontdesk_core::error::{FrontdeskError, Result};

use crate::client::{CompletionClient, CompletionMessage, MAX_KEYWORDS};

/// Deterministic, scriptable `CompletionClient`.
#[derive(Default)]
pub struct StubCompletion {
    replies: Mutex<VecDeque<String>>,
    default_reply: Mutex<String>,
    keywords: Mutex<Vec<String>>,
    failing: AtomicBool,
    calls: Mutex<Vec<Vec<CompletionMessage>>>,
}

impl StubCompletion {
    /// Stub that always answers with `reply`.
    pub fn with_reply(reply: impl Into<String>) -> Self {
        let stub = Self::default();
        *stub.default_reply.lock().unwrap() = reply.into();
        stub
    }

    /// Stub that answers with each queued reply in order, then falls back
    /// to the default (empty) reply.
    pub fn with_replies(replies: Vec<&str>) -> Self {
        let stub = Self::default();
        *stub.replies.lock().unwrap() = replies.into_iter().map(String::from).collect();
        stub
    }

    /// Fix the keyword set returned by `extract_keywords`.
    pub fn with_keywords(self, keywords: Vec<&str>) -> Self {
        *self.keywords.lock().unwrap() = keywords.into_iter().map(String::from).collect();
        self
    }

    /// Make every subsequent call fail with a Completion error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Message batches passed to `complete`, in call order.
    pub fn calls(&self) -> Vec<Vec<CompletionMessage>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for StubCompletion {
    async fn complete(
        &self,
        messages: &[CompletionMessage],
        _temperature: f32,
        _max_tokens: u32,
    ) -> Result<String> {
        self.calls.lock().unwrap().push(messages.to_vec());

        if self.failing.load(Ordering::SeqCst) {
            return Err(FrontdeskError::Completion("stub failure".to_string()));
        }

        let queued = self.replies.lock().unwrap().pop_front();
        Ok(queued.unwrap_or_else(|| self.default_reply.lock().unwrap().clone()))
    }

    async fn extract_keywords(&self, _text: &str) -> Result<Vec<String>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(FrontdeskError::Completion("stub failure".to_string()));
        }
        let keywords = self.keywords.lock().unwrap();
        Ok(keywords.iter().take(MAX_KEYWORDS).cloned().collect())
    }
}
