//! Per-session conversation state.
//!
//! A session is owned by exactly one handling context (one caller, one
//! channel); the orchestrator serializes access, so the struct itself
//! carries no locking.

use chrono::{DateTime, Utc};

use frontdesk_core::types::{ConversationTurn, TurnRole};

/// State for one active conversation.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    /// Collected lazily; escalations before collection use a placeholder.
    pub customer_phone: Option<String>,
    pub customer_name: Option<String>,
    pub history: Vec<ConversationTurn>,
    pub started_at: DateTime<Utc>,
    pub last_message_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            customer_phone: None,
            customer_name: None,
            history: Vec::new(),
            started_at: now,
            last_message_at: now,
        }
    }

    /// Append a turn and refresh the activity timestamp.
    pub fn append(&mut self, turn: ConversationTurn) {
        self.history.push(turn);
        self.last_message_at = Utc::now();
    }

    /// Render the history as the free-form context snapshot stored on an
    /// escalated help request.
    pub fn context_snapshot(&self) -> String {
        self.history
            .iter()
            .map(|turn| {
                let role = match turn.role {
                    TurnRole::User => "user",
                    TurnRole::Assistant => "assistant",
                };
                format!("{}: {}", role, turn.content)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
