//! Frontdesk notify crate - supervisor and customer notifications.
//!
//! Splits message formatting from transport: formatters are pure functions,
//! delivery goes through a replaceable `NotificationSink` (default:
//! structured log emission). Dispatch failures are contained and reported
//! as `false`, never as errors, so escalation and resolution stand even
//! when a notification cannot be delivered.

pub mod dispatcher;
pub mod sink;

pub use dispatcher::{format_customer_message, format_supervisor_message, NotificationDispatcher};
pub use sink::{LogSink, NotificationKind, NotificationSink};
