//! Frontdesk store crate - document persistence behind a narrow contract.
//!
//! The system of record is an external key-value document store addressed
//! as `collection / id -> JSON document`. This crate defines the contract
//! (`DocumentStore`), an in-memory implementation for tests and development,
//! and a SQLite-backed implementation for single-node deployments.

pub mod memory;
pub mod sqlite;
pub mod store;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use store::{collections, merge_document, DocumentStore};
