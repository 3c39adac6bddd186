//! Notification formatting and dispatch.

use std::sync::Arc;

use tracing::warn;

use frontdesk_core::types::HelpRequest;

use crate::sink::{NotificationKind, NotificationSink};

/// Recipient tag used for supervisor-bound messages.
const SUPERVISOR_RECIPIENT: &str = "supervisor";

/// Format the message asking a supervisor to pick up a help request.
pub fn format_supervisor_message(request: &HelpRequest) -> String {
    let customer = request
        .customer_name
        .as_deref()
        .unwrap_or(&request.customer_phone);
    let context = request.context.as_deref().unwrap_or("No additional context");
    format!(
        "Hey! I need help answering a customer question.\n\n\
         Customer: {}\n\
         Phone: {}\n\n\
         Question: {}\n\n\
         Context: {}\n\n\
         Request ID: {}\n\n\
         Please respond through the admin panel to help this customer!",
        customer, request.customer_phone, request.question, context, request.id
    )
}

/// Format the follow-up message carrying the supervisor's answer back to
/// the customer.
pub fn format_customer_message(question: &str, answer: &str) -> String {
    format!(
        "Hi! Thanks for your patience. Here's the answer to your question:\n\n\
         Your question: {}\n\n\
         Answer: {}\n\n\
         Feel free to call us again if you have more questions!",
        question, answer
    )
}

/// Formats and emits the two notification kinds through a replaceable sink.
///
/// Both operations return `false` on delivery failure instead of an error:
/// the triggering operation (escalation, resolution) must never be unwound
/// by a notification problem.
pub struct NotificationDispatcher {
    sink: Arc<dyn NotificationSink>,
    /// Retry budget from configuration. Recognized but not yet consumed;
    /// the dispatcher is single-attempt.
    retry_budget: u32,
}

impl NotificationDispatcher {
    pub fn new(sink: Arc<dyn NotificationSink>, retry_budget: u32) -> Self {
        Self { sink, retry_budget }
    }

    pub fn retry_budget(&self) -> u32 {
        self.retry_budget
    }

    /// Tell the supervisor about a new help request.
    pub async fn notify_supervisor(&self, request: &HelpRequest) -> bool {
        let message = format_supervisor_message(request);
        match self
            .sink
            .deliver(NotificationKind::ToSupervisor, SUPERVISOR_RECIPIENT, &message)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                warn!(request_id = %request.id, error = %e, "Supervisor notification failed");
                false
            }
        }
    }

    /// Send the supervisor's answer back to the customer.
    pub async fn notify_customer(&self, phone: &str, question: &str, answer: &str) -> bool {
        let message = format_customer_message(question, answer);
        match self
            .sink
            .deliver(NotificationKind::ToCustomer, phone, &message)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                warn!(phone = %phone, error = %e, "Customer notification failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::LogSink;
    use async_trait::async_trait;
    use chrono::Duration;
    use frontdesk_core::error::{FrontdeskError, Result};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Sink that fails every delivery and counts attempts.
    #[derive(Default)]
    struct FailingSink {
        attempts: AtomicUsize,
    }

    #[async_trait]
    impl NotificationSink for FailingSink {
        async fn deliver(
            &self,
            _kind: NotificationKind,
            _recipient: &str,
            _message: &str,
        ) -> Result<()> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(FrontdeskError::Notification("channel down".to_string()))
        }
    }

    /// Sink that records deliveries for assertions.
    #[derive(Default)]
    struct RecordingSink {
        deliveries: std::sync::Mutex<Vec<(NotificationKind, String, String)>>,
    }

    #[async_trait]
    impl NotificationSink for RecordingSink {
        async fn deliver(
            &self,
            kind: NotificationKind,
            recipient: &str,
            message: &str,
        ) -> Result<()> {
            self.deliveries.lock().unwrap().push((
                kind,
                recipient.to_string(),
                message.to_string(),
            ));
            Ok(())
        }
    }

    fn sample_request() -> HelpRequest {
        HelpRequest::new(
            "+15551234567".to_string(),
            Some("Dana".to_string()),
            "Do you do balayage on Sundays?".to_string(),
            Some("user: hi".to_string()),
            Duration::seconds(3600),
        )
    }

    // ---- Formatters ----

    #[test]
    fn test_supervisor_message_contains_identity_and_id() {
        let request = sample_request();
        let message = format_supervisor_message(&request);
        assert!(message.contains("Customer: Dana"));
        assert!(message.contains("Phone: +15551234567"));
        assert!(message.contains("Question: Do you do balayage on Sundays?"));
        assert!(message.contains("Context: user: hi"));
        assert!(message.contains(&request.id.to_string()));
    }

    #[test]
    fn test_supervisor_message_falls_back_to_phone_and_default_context() {
        let mut request = sample_request();
        request.customer_name = None;
        request.context = None;
        let message = format_supervisor_message(&request);
        assert!(message.contains("Customer: +15551234567"));
        assert!(message.contains("Context: No additional context"));
    }

    #[test]
    fn test_customer_message_contains_question_and_answer() {
        let message =
            format_customer_message("Do you do balayage on Sundays?", "Yes, by appointment");
        assert!(message.contains("Your question: Do you do balayage on Sundays?"));
        assert!(message.contains("Answer: Yes, by appointment"));
    }

    // ---- Dispatch ----

    #[tokio::test]
    async fn test_notify_supervisor_success() {
        let sink = Arc::new(RecordingSink::default());
        let dispatcher = NotificationDispatcher::new(sink.clone(), 3);
        let ok = dispatcher.notify_supervisor(&sample_request()).await;
        assert!(ok);

        let deliveries = sink.deliveries.lock().unwrap();
        assert_eq!(deliveries.len(), 1);
        assert_eq!(deliveries[0].0, NotificationKind::ToSupervisor);
        assert_eq!(deliveries[0].1, "supervisor");
    }

    #[tokio::test]
    async fn test_notify_customer_targets_phone() {
        let sink = Arc::new(RecordingSink::default());
        let dispatcher = NotificationDispatcher::new(sink.clone(), 3);
        let ok = dispatcher
            .notify_customer("+15551234567", "hours?", "9 to 8")
            .await;
        assert!(ok);

        let deliveries = sink.deliveries.lock().unwrap();
        assert_eq!(deliveries[0].0, NotificationKind::ToCustomer);
        assert_eq!(deliveries[0].1, "+15551234567");
        assert!(deliveries[0].2.contains("9 to 8"));
    }

    #[tokio::test]
    async fn test_sink_failure_returns_false_not_error() {
        let sink = Arc::new(FailingSink::default());
        let dispatcher = NotificationDispatcher::new(sink.clone(), 3);

        assert!(!dispatcher.notify_supervisor(&sample_request()).await);
        assert!(!dispatcher.notify_customer("+15551234567", "q", "a").await);
        // Single attempt each; the retry budget is not consumed.
        assert_eq!(sink.attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_log_sink_dispatch_succeeds() {
        let dispatcher = NotificationDispatcher::new(Arc::new(LogSink::new()), 3);
        assert!(dispatcher.notify_supervisor(&sample_request()).await);
    }

    #[test]
    fn test_retry_budget_is_surfaced() {
        let dispatcher = NotificationDispatcher::new(Arc::new(LogSink::new()), 5);
        assert_eq!(dispatcher.retry_budget(), 5);
    }
}
