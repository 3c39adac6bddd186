//! SQLite-backed document store.
//!
//! Wraps a single rusqlite Connection in a Mutex for thread-safe access.
//! Documents are stored as JSON text in one `documents` table keyed by
//! `(collection, id)`; id ordering gives `list_all` its stable order.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension};
use serde_json::Value;
use tracing::info;

use frontdesk_core::error::{FrontdeskError, Result};

use crate::store::{merge_document, DocumentStore};

/// Thread-safe SQLite document store.
///
/// Uses WAL mode for concurrent read/write safety. The connection is
/// wrapped in a Mutex since rusqlite Connection is not Sync.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a store at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists.
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)
            .map_err(|e| FrontdeskError::Persistence(format!("Failed to open store: {}", e)))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;",
        )
        .map_err(|e| FrontdeskError::Persistence(format!("Failed to set pragmas: {}", e)))?;

        info!("Document store opened at {}", path.display());

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.with_conn(init_schema)?;
        Ok(store)
    }

    /// Open an in-memory store (for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| {
            FrontdeskError::Persistence(format!("Failed to open in-memory store: {}", e))
        })?;

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.with_conn(init_schema)?;
        Ok(store)
    }

    /// Execute a closure with a reference to the underlying connection.
    ///
    /// The mutex is held for the duration of the closure.
    fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| FrontdeskError::Persistence(format!("store lock poisoned: {}", e)))?;
        f(&conn)
    }
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS documents (
            collection TEXT NOT NULL,
            id         TEXT NOT NULL,
            body       TEXT NOT NULL,
            PRIMARY KEY (collection, id)
        );",
    )
    .map_err(|e| FrontdeskError::Persistence(format!("Failed to create schema: {}", e)))?;
    Ok(())
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn set(&self, collection: &str, id: &str, document: Value) -> Result<()> {
        let body = serde_json::to_string(&document)?;
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO documents (collection, id, body) VALUES (?1, ?2, ?3)
                 ON CONFLICT (collection, id) DO UPDATE SET body = excluded.body",
                rusqlite::params![collection, id, body],
            )
            .map_err(|e| FrontdeskError::Persistence(format!("Failed to set document: {}", e)))?;
            Ok(())
        })
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>> {
        let body: Option<String> = self.with_conn(|conn| {
            conn.query_row(
                "SELECT body FROM documents WHERE collection = ?1 AND id = ?2",
                rusqlite::params![collection, id],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| FrontdeskError::Persistence(format!("Failed to get document: {}", e)))
        })?;

        match body {
            Some(body) => Ok(Some(serde_json::from_str(&body)?)),
            None => Ok(None),
        }
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> Result<()> {
        self.with_conn(|conn| {
            let body: Option<String> = conn
                .query_row(
                    "SELECT body FROM documents WHERE collection = ?1 AND id = ?2",
                    rusqlite::params![collection, id],
                    |row| row.get(0),
                )
                .optional()
                .map_err(|e| {
                    FrontdeskError::Persistence(format!("Failed to read document: {}", e))
                })?;

            let body =
                body.ok_or_else(|| FrontdeskError::NotFound(format!("{}/{}", collection, id)))?;
            let mut document: Value = serde_json::from_str(&body)?;
            merge_document(&mut document, patch);

            conn.execute(
                "UPDATE documents SET body = ?3 WHERE collection = ?1 AND id = ?2",
                rusqlite::params![collection, id, serde_json::to_string(&document)?],
            )
            .map_err(|e| {
                FrontdeskError::Persistence(format!("Failed to update document: {}", e))
            })?;
            Ok(())
        })
    }

    async fn list_all(&self, collection: &str) -> Result<BTreeMap<String, Value>> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT id, body FROM documents WHERE collection = ?1 ORDER BY id",
                )
                .map_err(|e| FrontdeskError::Persistence(e.to_string()))?;

            let rows = stmt
                .query_map(rusqlite::params![collection], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                })
                .map_err(|e| FrontdeskError::Persistence(e.to_string()))?;

            let mut documents = BTreeMap::new();
            for row in rows {
                let (id, body) = row.map_err(|e| FrontdeskError::Persistence(e.to_string()))?;
                documents.insert(id, serde_json::from_str(&body)?);
            }
            Ok(documents)
        })
    }
}
