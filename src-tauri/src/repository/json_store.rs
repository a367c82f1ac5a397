//! JSON File Store
//!
//! Keeps the whole document in one pretty-printed JSON file. Every save
//! rewrites the file; the write goes through a sibling temp file and a
//! rename so readers never see half a document.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use tracing::{debug, error, warn};

use super::traits::DocumentStore;
use crate::domain::{reconcile, DomainError, DomainResult, PersistedDocument, SaveResult, StoredDocument};

pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    #[cfg(test)]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn ensure_dir(&self) -> DomainResult<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|e| {
                DomainError::Internal(format!("Failed to create {}: {}", dir.display(), e))
            })?;
        }
        Ok(())
    }

    /// `None` when the file does not exist yet
    fn read(&self) -> DomainResult<Option<StoredDocument>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(DomainError::Internal(format!("Failed to read todos: {}", e))),
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| DomainError::InvalidInput(format!("Corrupt todo file: {}", e)))
    }

    fn write(&self, doc: &PersistedDocument) -> DomainResult<()> {
        let json = serde_json::to_string_pretty(doc)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .map_err(|e| DomainError::Internal(format!("Failed to write {}: {}", tmp.display(), e)))?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            DomainError::Internal(format!("Failed to replace {}: {}", self.path.display(), e))
        })
    }
}

impl DocumentStore for JsonFileStore {
    fn load(&self) -> PersistedDocument {
        match self.ensure_dir().and_then(|_| self.read()) {
            Ok(Some(stored)) => reconcile(stored, crate::now_millis()),
            Ok(None) => {
                debug!("No todo file at {}, starting empty", self.path.display());
                PersistedDocument::default()
            }
            Err(e) => {
                warn!("Error reading todos: {}", e);
                PersistedDocument::default()
            }
        }
    }

    fn save(&self, doc: &PersistedDocument) -> SaveResult {
        match self.ensure_dir().and_then(|_| self.write(doc)) {
            Ok(()) => SaveResult { success: true },
            Err(e) => {
                error!("Error saving todos: {}", e);
                SaveResult { success: false }
            }
        }
    }
}
