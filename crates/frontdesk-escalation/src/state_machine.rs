//! Help request state machine with validated transitions.
//!
//! Enforces the allowed transitions for the request lifecycle:
//! Pending -> Resolved, Pending -> Timeout. Both targets are terminal.

use frontdesk_core::error::FrontdeskError;
use frontdesk_core::types::RequestStatus;

/// Validate that a status transition is allowed.
///
/// Valid transitions:
/// - Pending -> Resolved
/// - Pending -> Timeout
pub fn validate_transition(from: RequestStatus, to: RequestStatus) -> Result<(), FrontdeskError> {
    let valid = matches!(
        (from, to),
        (RequestStatus::Pending, RequestStatus::Resolved)
            | (RequestStatus::Pending, RequestStatus::Timeout)
    );

    if valid {
        Ok(())
    } else {
        Err(FrontdeskError::Validation(format!(
            "invalid status transition: {} -> {}",
            from, to
        )))
    }
}
