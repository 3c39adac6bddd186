//! The notification transport seam.

use async_trait::async_trait;

use frontdesk_core::error::Result;

/// The two message kinds the dispatcher emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    ToSupervisor,
    ToCustomer,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationKind::ToSupervisor => write!(f, "to_supervisor"),
            NotificationKind::ToCustomer => write!(f, "to_customer"),
        }
    }
}

/// Replaceable delivery channel: console, SMS gateway, webhook.
///
/// Delivery is at-least-once attempted and fire-and-forget from the
/// caller's perspective; implementations should not block for long.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn deliver(&self, kind: NotificationKind, recipient: &str, message: &str) -> Result<()>;
}

/// Default sink: emits the notification as a structured log record.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl LogSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationSink for LogSink {
    async fn deliver(&self, kind: NotificationKind, recipient: &str, message: &str) -> Result<()> {
        tracing::info!(kind = %kind, recipient = %recipient, "\n{}", message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_display() {
        assert_eq!(NotificationKind::ToSupervisor.to_string(), "to_supervisor");
        assert_eq!(NotificationKind::ToCustomer.to_string(), "to_customer");
    }

    #[tokio::test]
    async fn test_log_sink_never_fails() {
        let sink = LogSink::new();
        let result = sink
            .deliver(NotificationKind::ToCustomer, "+15551234567", "hello")
            .await;
        assert!(result.is_ok());
    }
}
