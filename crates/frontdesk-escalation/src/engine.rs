//! The help request engine.
//!
//! Each lifecycle operation has one primary store write; everything chained
//! after it (notifications, knowledge ingestion, the notified-flag write)
//! is a secondary effect whose failure is logged and never unwinds the
//! primary. A request that is resolved but whose customer notification
//! failed is an accepted, observable final state.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{error, info, warn};
use uuid::Uuid;

use frontdesk_core::error::{FrontdeskError, Result};
use frontdesk_core::types::{HelpRequest, RequestStatus};
use frontdesk_knowledge::KnowledgeEngine;
use frontdesk_notify::NotificationDispatcher;
use frontdesk_store::{collections, DocumentStore};

use crate::state_machine::validate_transition;

/// Supervisor identifier recorded when the resolver does not name one.
const DEFAULT_SUPERVISOR_ID: &str = "supervisor_1";

/// Owns the help request lifecycle.
pub struct HelpRequestEngine {
    store: Arc<dyn DocumentStore>,
    dispatcher: Arc<NotificationDispatcher>,
    knowledge: Arc<KnowledgeEngine>,
    timeout: Duration,
}

impl HelpRequestEngine {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        dispatcher: Arc<NotificationDispatcher>,
        knowledge: Arc<KnowledgeEngine>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            store,
            dispatcher,
            knowledge,
            timeout: Duration::seconds(timeout_secs as i64),
        }
    }

    /// Create a new pending request and notify the supervisor.
    ///
    /// The store write is the primary effect; a failed supervisor
    /// notification leaves the request in place.
    pub async fn create(
        &self,
        customer_phone: &str,
        customer_name: Option<String>,
        question: &str,
        context: Option<String>,
    ) -> Result<HelpRequest> {
        if customer_phone.trim().is_empty() {
            return Err(FrontdeskError::Validation(
                "customer_phone must not be empty".to_string(),
            ));
        }
        if question.trim().is_empty() {
            return Err(FrontdeskError::Validation(
                "question must not be empty".to_string(),
            ));
        }

        let request = HelpRequest::new(
            customer_phone.to_string(),
            customer_name,
            question.to_string(),
            context,
            self.timeout,
        );

        self.store
            .set(
                collections::HELP_REQUESTS,
                &request.id.to_string(),
                serde_json::to_value(&request)?,
            )
            .await?;

        if !self.dispatcher.notify_supervisor(&request).await {
            warn!(request_id = %request.id, "Supervisor was not notified; request stands");
        }

        info!(request_id = %request.id, "Help request created");
        Ok(request)
    }

    /// Fetch a single request.
    pub async fn get(&self, id: Uuid) -> Result<Option<HelpRequest>> {
        let document = self
            .store
            .get(collections::HELP_REQUESTS, &id.to_string())
            .await?;
        match document {
            Some(document) => Ok(Some(serde_json::from_value(document)?)),
            None => Ok(None),
        }
    }

    /// All requests, newest-created first, optionally filtered by status.
    pub async fn list(&self, status: Option<RequestStatus>) -> Result<Vec<HelpRequest>> {
        let documents = self.store.list_all(collections::HELP_REQUESTS).await?;
        let mut requests = Vec::with_capacity(documents.len());
        for (_, document) in documents {
            let request: HelpRequest = serde_json::from_value(document)?;
            if status.is_none() || status == Some(request.status) {
                requests.push(request);
            }
        }
        requests.sort_by_key(|r| std::cmp::Reverse(r.created_at));
        Ok(requests)
    }

    /// Resolve a pending request with the supervisor's answer.
    ///
    /// Idempotent against double resolution: a request already in a
    /// terminal state is returned unchanged. On success the resolution
    /// write is the primary effect; customer notification, the
    /// notified-flag write, and knowledge ingestion are each isolated.
    pub async fn resolve(
        &self,
        id: Uuid,
        supervisor_answer: &str,
        supervisor_id: Option<String>,
    ) -> Result<HelpRequest> {
        if supervisor_answer.trim().is_empty() {
            return Err(FrontdeskError::Validation(
                "supervisor_answer must not be empty".to_string(),
            ));
        }

        let mut request = self
            .get(id)
            .await?
            .ok_or_else(|| FrontdeskError::NotFound(format!("help request {}", id)))?;

        if request.status != RequestStatus::Pending {
            warn!(request_id = %id, status = %request.status, "Resolve on non-pending request is a no-op");
            return Ok(request);
        }
        validate_transition(request.status, RequestStatus::Resolved)?;

        let now = Utc::now();
        let supervisor_id = supervisor_id.unwrap_or_else(|| DEFAULT_SUPERVISOR_ID.to_string());

        self.store
            .update(
                collections::HELP_REQUESTS,
                &id.to_string(),
                serde_json::json!({
                    "status": RequestStatus::Resolved,
                    "supervisor_answer": supervisor_answer,
                    "supervisor_id": supervisor_id,
                    "resolved_at": now,
                    "updated_at": now,
                }),
            )
            .await?;

        request.status = RequestStatus::Resolved;
        request.supervisor_answer = Some(supervisor_answer.to_string());
        request.supervisor_id = Some(supervisor_id);
        request.resolved_at = Some(now);
        request.updated_at = now;

        // Secondary effects from here on: contained, never propagated.
        if self
            .dispatcher
            .notify_customer(&request.customer_phone, &request.question, supervisor_answer)
            .await
        {
            let sent_at = Utc::now();
            match self
                .store
                .update(
                    collections::HELP_REQUESTS,
                    &id.to_string(),
                    serde_json::json!({
                        "customer_notified": true,
                        "notification_sent_at": sent_at,
                    }),
                )
                .await
            {
                Ok(()) => {
                    request.customer_notified = true;
                    request.notification_sent_at = Some(sent_at);
                }
                Err(e) => {
                    // Resolved but the notified flag is stale: accepted.
                    warn!(request_id = %id, error = %e, "Failed to persist notified flag");
                }
            }
        }

        if let Err(e) = self.knowledge.add_from_resolved_request(&request).await {
            error!(request_id = %id, error = %e, "Knowledge ingestion failed; resolution stands");
        }

        info!(request_id = %id, "Help request resolved");
        Ok(request)
    }

    /// Transition a request to timeout.
    ///
    /// Only meaningful while pending; the pending check is the caller's
    /// (the sweep selects from the pending listing).
    pub async fn mark_timeout(&self, id: Uuid) -> Result<()> {
        self.store
            .update(
                collections::HELP_REQUESTS,
                &id.to_string(),
                serde_json::json!({
                    "status": RequestStatus::Timeout,
                    "updated_at": Utc::now(),
                }),
            )
            .await?;
        info!(request_id = %id, "Help request timed out");
        Ok(())
    }

    /// Transition every pending request past its deadline.
    ///
    /// Safe to run concurrently with live creation/resolution and with
    /// overlapping sweeps: it only acts on requests still pending at the
    /// moment it listed them, and already-transitioned requests are simply
    /// absent from the next pending listing.
    pub async fn sweep_timeouts(&self) -> Result<u64> {
        let pending = self.list(Some(RequestStatus::Pending)).await?;
        let now = Utc::now();

        let mut timed_out = 0;
        for request in pending {
            if now > request.timeout_at {
                match self.mark_timeout(request.id).await {
                    Ok(()) => timed_out += 1,
                    Err(e) => {
                        warn!(request_id = %request.id, error = %e, "Timeout transition failed")
                    }
                }
            }
        }

        if timed_out > 0 {
            info!(count = timed_out, "Timed out pending help requests");
        }
        Ok(timed_out)
    }
}

// =============================================================================
// Tests
// =============================================================================
