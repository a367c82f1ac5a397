//! Domain Layer
//!
//! Contains all domain entities and core abstractions.
//! This layer has NO external dependencies (except serde for serialization).

mod entity;
mod todo;
mod section;
mod document;
mod reconcile;

pub use entity::{DomainError, DomainResult};
pub use todo::{Todo, TodoPatch, Priority};
pub use section::{default_sections, Section, DEFAULT_SECTION_ID};
pub use document::{PersistedDocument, StoredDocument, SaveResult};
pub use reconcile::{reconcile, reconcile_for_save, sorted_view, SortMethod};
