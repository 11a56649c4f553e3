//! Persistence for reports and query history
//!
//! Two operations, two backends: SQLite when a database path is configured,
//! a directory of JSON files otherwise.

mod file;
mod sqlite;

pub use file::FileStore;
pub use sqlite::SqliteStore;

use crate::config::StoreConfig;
use crate::error::{Result, SiteWiseError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Collection holding master analysis reports
pub const REPORTS_COLLECTION: &str = "reports";

/// Collection holding search history
pub const QUERIES_COLLECTION: &str = "queries";

/// A persisted JSON document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDocument {
    pub id: String,
    pub collection: String,
    pub created_at: DateTime<Utc>,
    pub data: Value,
}

impl StoredDocument {
    fn new(collection: &str, data: Value) -> Self {
        let created_at = Utc::now();
        let id = document_id(collection, &created_at, &data);
        Self {
            id,
            collection: collection.to_string(),
            created_at,
            data,
        }
    }
}

/// Storage backend
pub trait DocumentStore {
    /// Append a document to a collection
    fn save(&self, collection: &str, document: Value) -> Result<StoredDocument>;

    /// All documents in a collection, oldest first
    fn list(&self, collection: &str) -> Result<Vec<StoredDocument>>;

    /// Most recently saved document
    fn latest(&self, collection: &str) -> Result<Option<StoredDocument>> {
        Ok(self.list(collection)?.pop())
    }
}

/// Open the backend selected by configuration
pub fn open_store(config: &StoreConfig) -> Result<Box<dyn DocumentStore>> {
    match config.database_path {
        Some(ref path) => {
            tracing::debug!("Using SQLite store at {}", path.display());
            Ok(Box::new(SqliteStore::open(path)?))
        }
        None => {
            tracing::debug!("Using file store in {}", config.directory.display());
            Ok(Box::new(FileStore::new(&config.directory)))
        }
    }
}

/// Short content id: first 16 hex chars of a BLAKE3 hash
fn document_id(collection: &str, created_at: &DateTime<Utc>, data: &Value) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(collection.as_bytes());
    hasher.update(created_at.to_rfc3339().as_bytes());
    hasher.update(data.to_string().as_bytes());
    hasher.finalize().to_hex().chars().take(16).collect()
}

/// Collection names become file names, so keep them plain
fn validate_collection(collection: &str) -> Result<()> {
    let valid = !collection.is_empty()
        && collection
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(SiteWiseError::InvalidInput(format!(
            "invalid collection name: {:?}",
            collection
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_collection_names() {
        assert!(validate_collection("reports").is_ok());
        assert!(validate_collection("site_b-2").is_ok());
        assert!(validate_collection("").is_err());
        assert!(validate_collection("../etc").is_err());
    }

    #[test]
    fn test_open_store_prefers_database() {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig {
            database_path: Some(dir.path().join("sitewise.sqlite")),
            directory: dir.path().join("files"),
        };
        let store = open_store(&config).unwrap();
        store.save("reports", serde_json::json!({ "a": 1 })).unwrap();

        assert!(dir.path().join("sitewise.sqlite").exists());
        assert!(!dir.path().join("files").exists());
    }

    #[test]
    fn test_open_store_falls_back_to_files() {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig {
            database_path: None,
            directory: dir.path().join("files"),
        };
        let store = open_store(&config).unwrap();
        store.save("reports", serde_json::json!({ "a": 1 })).unwrap();
        assert!(dir.path().join("files").join("reports.json").exists());
    }
}
