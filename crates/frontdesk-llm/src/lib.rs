//! Frontdesk LLM crate - the text-completion capability.
//!
//! Defines the `CompletionClient` contract used by the knowledge engine
//! (keyword extraction) and the conversation agent (answer generation),
//! an OpenAI-compatible HTTP implementation, and a scripted stub for tests.

pub mod client;
pub mod http;
pub mod stub;

pub use client::{CompletionClient, CompletionMessage, MessageRole, MAX_KEYWORDS};
pub use http::HttpCompletionClient;
pub use stub::StubCompletion;
