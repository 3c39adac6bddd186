//! Shared domain types for the escalation and knowledge engines.
//!
//! These records are the persisted document shapes: timestamps serialize as
//! ISO-8601 strings and enums as lowercase wire strings. Unknown enum
//! strings are rejected on deserialization.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// =============================================================================
// Enums
// =============================================================================

/// Help request lifecycle states.
///
/// Pending -> Resolved or Pending -> Timeout; both targets are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Resolved,
    Timeout,
}

impl RequestStatus {
    /// Whether the state admits no further transitions.
    pub fn is_terminal(self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestStatus::Pending => write!(f, "pending"),
            RequestStatus::Resolved => write!(f, "resolved"),
            RequestStatus::Timeout => write!(f, "timeout"),
        }
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RequestStatus::Pending),
            "resolved" => Ok(RequestStatus::Resolved),
            "timeout" => Ok(RequestStatus::Timeout),
            _ => Err(format!("Unknown request status: {}", s)),
        }
    }
}

/// Where a knowledge entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KnowledgeSource {
    Manual,
    Supervisor,
}

impl fmt::Display for KnowledgeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KnowledgeSource::Manual => write!(f, "manual"),
            KnowledgeSource::Supervisor => write!(f, "supervisor"),
        }
    }
}

impl std::str::FromStr for KnowledgeSource {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(KnowledgeSource::Manual),
            "supervisor" => Ok(KnowledgeSource::Supervisor),
            _ => Err(format!("Unknown knowledge source: {}", s)),
        }
    }
}

/// Speaker role for a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    User,
    Assistant,
}

impl fmt::Display for TurnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnRole::User => write!(f, "user"),
            TurnRole::Assistant => write!(f, "assistant"),
        }
    }
}

// =============================================================================
// Domain records
// =============================================================================

/// An escalation record raised when the agent cannot answer a caller.
///
/// Never deleted; terminal states keep the full audit trail. `timeout_at`
/// is fixed at creation and never changes afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelpRequest {
    pub id: Uuid,
    pub customer_phone: String,
    pub customer_name: Option<String>,
    pub question: String,
    /// Free-form conversation snapshot captured at escalation time.
    pub context: Option<String>,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub timeout_at: DateTime<Utc>,
    pub supervisor_answer: Option<String>,
    pub supervisor_id: Option<String>,
    pub customer_notified: bool,
    pub notification_sent_at: Option<DateTime<Utc>>,
}

impl HelpRequest {
    /// Create a new pending request with `timeout_at = created_at + timeout`.
    pub fn new(
        customer_phone: String,
        customer_name: Option<String>,
        question: String,
        context: Option<String>,
        timeout: Duration,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            customer_phone,
            customer_name,
            question,
            context,
            status: RequestStatus::Pending,
            created_at: now,
            updated_at: now,
            resolved_at: None,
            timeout_at: now + timeout,
            supervisor_answer: None,
            supervisor_id: None,
            customer_notified: false,
            notification_sent_at: None,
        }
    }
}

/// A learned question/answer pair the agent can retrieve to avoid
/// re-escalating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub id: Uuid,
    pub question: String,
    pub answer: String,
    /// Coarse grouping for the summary view, e.g. "hours" or "pricing".
    pub category: Option<String>,
    pub keywords: Vec<String>,
    pub source: KnowledgeSource,
    /// Back-reference to the help request this entry was learned from.
    pub source_request_id: Option<Uuid>,
    pub confidence: f64,
    pub times_used: u64,
    pub last_used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl KnowledgeEntry {
    pub fn new(
        question: String,
        answer: String,
        category: Option<String>,
        keywords: Vec<String>,
        source: KnowledgeSource,
        source_request_id: Option<Uuid>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            question,
            answer,
            category,
            keywords,
            source,
            source_request_id,
            confidence: 1.0,
            times_used: 0,
            last_used_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A caller known to the system, keyed by sanitized phone number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub phone: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub total_calls: u64,
    pub last_call_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    pub fn new(phone: String, name: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            phone,
            name,
            email: None,
            total_calls: 0,
            last_call_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// One turn of a conversation session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
