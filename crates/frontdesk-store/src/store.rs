//! The document store contract.
//!
//! Mutations are read-modify-write with last-writer-wins semantics; there
//! is no concurrency token on updates. Engines accept this for single-
//! supervisor operation and never rely on in-process state as the source
//! of truth.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;

use frontdesk_core::error::Result;

/// Collection names used by the engines.
pub mod collections {
    pub const HELP_REQUESTS: &str = "help_requests";
    pub const KNOWLEDGE_BASE: &str = "knowledge_base";
    pub const CUSTOMERS: &str = "customers";
}

/// Key-value document store addressed as `collection / id -> document`.
///
/// `update` has merge semantics: top-level fields of the patch replace the
/// corresponding fields of the stored document, untouched fields survive.
/// Updating an absent document is a `NotFound` error, not an upsert.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create or fully replace a document.
    async fn set(&self, collection: &str, id: &str, document: Value) -> Result<()>;

    /// Fetch a document, or `None` if absent.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>>;

    /// Merge `patch`'s top-level fields into an existing document.
    async fn update(&self, collection: &str, id: &str, patch: Value) -> Result<()>;

    /// All documents in a collection, keyed by id, in stable id order.
    async fn list_all(&self, collection: &str) -> Result<BTreeMap<String, Value>>;
}

/// Merge `patch`'s top-level object fields into `document`.
///
/// Non-object patches replace the document wholesale, matching the
/// `set`-like behavior a caller gets when it does not send a field map.
pub fn merge_document(document: &mut Value, patch: Value) {
    match patch {
        Value::Object(fields) => {
            if let Some(target) = document.as_object_mut() {
                for (key, value) in fields {
                    target.insert(key, value);
                }
                return;
            }
            *document = Value::Object(fields);
        }
        patch => *document = patch,
    }
}
