//! Conversation orchestrator: answer from knowledge or escalate.
//!
//! Each inbound utterance is scored against the knowledge base, the
//! completion capability judges whether it can answer from that context,
//! and the sentinel reply (or any completion failure) routes the question
//! to the help request engine. Inability to judge confidence always takes
//! the safe path of human handoff.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::{info, warn};

use frontdesk_core::config::AgentConfig;
use frontdesk_core::error::{FrontdeskError, Result};
use frontdesk_core::types::{ConversationTurn, Customer};
use frontdesk_core::validate::{is_valid_phone, sanitize_phone_key};
use frontdesk_escalation::HelpRequestEngine;
use frontdesk_knowledge::KnowledgeEngine;
use frontdesk_llm::{CompletionClient, CompletionMessage};
use frontdesk_store::{collections, DocumentStore};

use crate::prompts;
use crate::session::Session;

/// Maximum message length in characters.
const MAX_MESSAGE_LENGTH: usize = 2000;

/// Temperature for the confidence-gated answer call.
const ANSWER_TEMPERATURE: f32 = 0.3;

/// Token cap for the answer call.
const ANSWER_MAX_TOKENS: u32 = 500;

/// Phone placeholder for escalations raised before identity collection.
const UNKNOWN_PHONE: &str = "unknown";

/// Per-session conversation loop over the knowledge and escalation engines.
pub struct ConversationOrchestrator {
    sessions: Mutex<HashMap<String, Session>>,
    knowledge: Arc<KnowledgeEngine>,
    escalation: Arc<HelpRequestEngine>,
    completion: Arc<dyn CompletionClient>,
    store: Arc<dyn DocumentStore>,
    config: AgentConfig,
}

impl ConversationOrchestrator {
    pub fn new(
        knowledge: Arc<KnowledgeEngine>,
        escalation: Arc<HelpRequestEngine>,
        completion: Arc<dyn CompletionClient>,
        store: Arc<dyn DocumentStore>,
        config: AgentConfig,
    ) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            knowledge,
            escalation,
            completion,
            store,
            config,
        }
    }

    /// Greeting for a newly opened session.
    pub fn greeting(&self) -> String {
        prompts::greeting(&self.config.business_name)
    }

    /// Handle one customer utterance and return the reply text.
    pub async fn process_message(&self, session_id: &str, text: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Err(FrontdeskError::Validation(
                "message must not be empty".to_string(),
            ));
        }
        if text.chars().count() > MAX_MESSAGE_LENGTH {
            return Err(FrontdeskError::Validation(format!(
                "message exceeds maximum length of {} characters",
                MAX_MESSAGE_LENGTH
            )));
        }

        // Record the user turn and capture what escalation would need,
        // without holding the session lock across any await.
        let (phone, name, snapshot) = self.with_session(session_id, |session| {
            session.append(ConversationTurn::user(text));
            (
                session.customer_phone.clone(),
                session.customer_name.clone(),
                session.context_snapshot(),
            )
        })?;

        let matches = self
            .knowledge
            .search(text, self.config.context_entries)
            .await?;

        let messages = [
            CompletionMessage::system(prompts::build_system_prompt(
                &self.config.business_name,
                &matches,
            )),
            CompletionMessage::user(text),
        ];

        let reply = match self
            .completion
            .complete(&messages, ANSWER_TEMPERATURE, ANSWER_MAX_TOKENS)
            .await
        {
            Ok(reply) if !reply.contains(prompts::NEEDS_HELP_SENTINEL) => reply,
            Ok(_) => {
                info!(session_id, "Agent cannot answer; escalating");
                return Ok(self.escalate(phone, name, text, snapshot).await);
            }
            Err(e) => {
                // Unable to judge confidence: default to human handoff.
                warn!(session_id, error = %e, "Completion failed; escalating");
                return Ok(self.escalate(phone, name, text, snapshot).await);
            }
        };

        // The reply leaned on the retrieved context; track usage of the
        // best match. Secondary effect, best effort.
        if let Some(top) = matches.first() {
            self.knowledge.increment_usage(top.id).await;
        }

        self.with_session(session_id, |session| {
            session.append(ConversationTurn::assistant(reply.clone()));
        })?;

        Ok(reply)
    }

    /// Record the caller's identity for a session and upsert the customer
    /// record (one call counted per identification).
    pub async fn set_caller(
        &self,
        session_id: &str,
        phone: &str,
        name: Option<String>,
    ) -> Result<()> {
        if !is_valid_phone(phone) {
            return Err(FrontdeskError::Validation(format!(
                "invalid phone number: {}",
                phone
            )));
        }

        self.with_session(session_id, |session| {
            session.customer_phone = Some(phone.to_string());
            if name.is_some() {
                session.customer_name = name.clone();
            }
        })?;

        let key = sanitize_phone_key(phone);
        let now = Utc::now();
        let mut customer = match self.store.get(collections::CUSTOMERS, &key).await? {
            Some(document) => serde_json::from_value::<Customer>(document)?,
            None => Customer::new(phone.to_string(), name.clone()),
        };
        customer.total_calls += 1;
        customer.last_call_at = Some(now);
        customer.updated_at = now;
        if name.is_some() {
            customer.name = name;
        }

        self.store
            .set(collections::CUSTOMERS, &key, serde_json::to_value(&customer)?)
            .await?;
        Ok(())
    }

    /// History for a session, if it exists.
    pub fn history(&self, session_id: &str) -> Option<Vec<ConversationTurn>> {
        self.sessions
            .lock()
            .ok()
            .and_then(|sessions| sessions.get(session_id).map(|s| s.history.clone()))
    }

    /// Number of active sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }

    // -- Private helpers --

    async fn escalate(
        &self,
        phone: Option<String>,
        name: Option<String>,
        question: &str,
        snapshot: String,
    ) -> String {
        let phone = phone.unwrap_or_else(|| UNKNOWN_PHONE.to_string());
        match self
            .escalation
            .create(&phone, name, question, Some(snapshot))
            .await
        {
            Ok(request) => {
                info!(request_id = %request.id, "Escalated to supervisor");
                prompts::escalation_message().to_string()
            }
            Err(e) => {
                warn!(error = %e, "Failed to create help request");
                prompts::supervisor_unreachable_message().to_string()
            }
        }
    }

    fn with_session<F, T>(&self, session_id: &str, f: F) -> Result<T>
    where
        F: FnOnce(&mut Session) -> T,
    {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|e| FrontdeskError::Persistence(format!("session lock poisoned: {}", e)))?;
        let session = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Session::new(session_id));
        Ok(f(session))
    }
}

// =============================================================================
// Tests
// =============================================================================
