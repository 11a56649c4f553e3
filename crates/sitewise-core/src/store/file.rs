//! Directory of JSON files, one array per collection

use super::{validate_collection, DocumentStore, StoredDocument};
use crate::error::Result;
use std::path::{Path, PathBuf};

pub struct FileStore {
    directory: PathBuf,
}

impl FileStore {
    /// The directory is created lazily on first save
    pub fn new(directory: impl AsRef<Path>) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
        }
    }

    fn collection_path(&self, collection: &str) -> PathBuf {
        self.directory.join(format!("{}.json", collection))
    }

    fn read_collection(&self, path: &Path) -> Result<Vec<StoredDocument>> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }
}

impl DocumentStore for FileStore {
    fn save(&self, collection: &str, document: serde_json::Value) -> Result<StoredDocument> {
        validate_collection(collection)?;
        std::fs::create_dir_all(&self.directory)?;

        let path = self.collection_path(collection);
        let mut documents = self.read_collection(&path)?;
        let stored = StoredDocument::new(collection, document);
        documents.push(stored.clone());

        // Write then rename so a crash never leaves half a file
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_string_pretty(&documents)?)?;
        std::fs::rename(&tmp, &path)?;

        tracing::debug!("Saved {} to {}", stored.id, path.display());
        Ok(stored)
    }

    fn list(&self, collection: &str) -> Result<Vec<StoredDocument>> {
        validate_collection(collection)?;
        self.read_collection(&self.collection_path(collection))
    }
}
