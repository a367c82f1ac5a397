//! Repository Layer - Core Traits
//!
//! Defines the abstract interface for the durable todo document.
//! Implementations must never fail outward: a broken or missing file reads
//! as the default document and a failed write reports `success: false`.

use crate::domain::{reconcile_for_save, PersistedDocument, SaveResult, StoredDocument};

pub trait DocumentStore: Send + Sync {
    /// Read and normalise the stored document
    fn load(&self) -> PersistedDocument;

    /// Overwrite the stored document
    fn save(&self, doc: &PersistedDocument) -> SaveResult;

    /// Save a document in either stored shape (legacy array or object)
    fn save_stored(&self, doc: StoredDocument) -> SaveResult {
        self.save(&reconcile_for_save(doc, crate::now_millis()))
    }
}
