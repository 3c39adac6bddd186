//! Frontdesk agent crate - the conversation orchestrator.
//!
//! Runs the per-session loop: each customer utterance is answered from the
//! knowledge base via the completion capability, or escalated to a human
//! supervisor when the model signals it cannot answer confidently.

pub mod orchestrator;
pub mod prompts;
pub mod session;

pub use orchestrator::ConversationOrchestrator;
pub use session::Session;
