//! In-memory document store for tests and development.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use frontdesk_core::error::{FrontdeskError, Result};

use crate::store::{merge_document, DocumentStore};

/// HashMap-backed store. Documents live in `collection -> id -> document`
/// maps behind a single mutex; the lock is never held across an await.
#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, BTreeMap<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection. Test helper.
    pub fn count(&self, collection: &str) -> usize {
        self.collections
            .lock()
            .map(|c| c.get(collection).map(|docs| docs.len()).unwrap_or(0))
            .unwrap_or(0)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn set(&self, collection: &str, id: &str, document: Value) -> Result<()> {
        let mut collections = self
            .collections
            .lock()
            .map_err(|e| FrontdeskError::Persistence(format!("store lock poisoned: {}", e)))?;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), document);
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>> {
        let collections = self
            .collections
            .lock()
            .map_err(|e| FrontdeskError::Persistence(format!("store lock poisoned: {}", e)))?;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> Result<()> {
        let mut collections = self
            .collections
            .lock()
            .map_err(|e| FrontdeskError::Persistence(format!("store lock poisoned: {}", e)))?;
        let document = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| FrontdeskError::NotFound(format!("{}/{}", collection, id)))?;
        merge_document(document, patch);
        Ok(())
    }

    async fn list_all(&self, collection: &str) -> Result<BTreeMap<String, Value>> {
        let collections = self
            .collections
            .lock()
            .map_err(|e| FrontdeskError::Persistence(format!("store lock poisoned: {}", e)))?;
        Ok(collections.get(collection).cloned().unwrap_or_default())
    }
}
