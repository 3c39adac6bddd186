//! Application state shared across all route handlers.
//!
//! AppState holds references to the engines. It is passed to handlers via
//! axum's State extractor; all services are `Arc`-shared and constructed
//! once at process start.

use std::sync::Arc;
use std::time::Instant;

use frontdesk_agent::ConversationOrchestrator;
use frontdesk_escalation::HelpRequestEngine;
use frontdesk_knowledge::KnowledgeEngine;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Help request lifecycle engine.
    pub escalation: Arc<HelpRequestEngine>,
    /// Knowledge base engine.
    pub knowledge: Arc<KnowledgeEngine>,
    /// Conversation orchestrator for the chat surface.
    pub agent: Arc<ConversationOrchestrator>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        escalation: Arc<HelpRequestEngine>,
        knowledge: Arc<KnowledgeEngine>,
        agent: Arc<ConversationOrchestrator>,
    ) -> Self {
        Self {
            escalation,
            knowledge,
            agent,
            start_time: Instant::now(),
        }
    }
}
