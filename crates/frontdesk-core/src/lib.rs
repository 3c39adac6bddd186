//! Frontdesk core crate - configuration, errors, shared domain types.
//!
//! Defines the cross-crate error taxonomy, the TOML-backed configuration,
//! the persisted domain records (help requests, knowledge entries,
//! customers), and input validation helpers.

pub mod config;
pub mod error;
pub mod types;
pub mod validate;

pub use config::FrontdeskConfig;
pub use error::{FrontdeskError, Result};
pub use types::{
    ConversationTurn, Customer, HelpRequest, KnowledgeEntry, KnowledgeSource, RequestStatus,
    TurnRole,
};
