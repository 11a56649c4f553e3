//! SQLite-backed document store

use super::{validate_collection, DocumentStore, StoredDocument};
use crate::error::{Result, SiteWiseError};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;

const SCHEMA_VERSION: i32 = 1;

const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS stored_documents (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL,
    collection TEXT NOT NULL,
    data TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY
);

CREATE INDEX IF NOT EXISTS idx_stored_documents_collection ON stored_documents(collection);
"#;

/// Reports and query history in a single SQLite file
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open database at path, creating it and its schema if necessary
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let store = Self {
            conn: Connection::open(path)?,
        };
        store.initialize()?;
        Ok(store)
    }

    /// Open in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;
        self.conn.execute_batch(CREATE_TABLES)?;
        self.conn.execute(
            "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
            params![SCHEMA_VERSION],
        )?;
        Ok(())
    }
}

impl DocumentStore for SqliteStore {
    fn save(&self, collection: &str, document: serde_json::Value) -> Result<StoredDocument> {
        validate_collection(collection)?;
        let stored = StoredDocument::new(collection, document);

        self.conn.execute(
            "INSERT INTO stored_documents (id, collection, data, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                stored.id,
                stored.collection,
                serde_json::to_string(&stored.data)?,
                stored.created_at.to_rfc3339()
            ],
        )?;
        tracing::debug!("Saved {} to {}", stored.id, collection);
        Ok(stored)
    }

    fn list(&self, collection: &str) -> Result<Vec<StoredDocument>> {
        validate_collection(collection)?;

        let mut stmt = self.conn.prepare(
            "SELECT id, collection, data, created_at FROM stored_documents
             WHERE collection = ?1 ORDER BY seq ASC",
        )?;
        let rows = stmt
            .query_map(params![collection], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, collection, data, created_at)| -> Result<StoredDocument> {
                let created_at = DateTime::parse_from_rfc3339(&created_at)
                    .map_err(|e| SiteWiseError::Other(e.into()))?
                    .with_timezone(&Utc);
                Ok(StoredDocument {
                    id,
                    collection,
                    created_at,
                    data: serde_json::from_str(&data)?,
                })
            })
            .collect()
    }
}
