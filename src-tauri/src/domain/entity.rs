//! Domain Layer - Core Entity Trait
//!
//! This trait defines the basic contract for all domain entities.
//! All entities must have a unique ID and be thread-safe.

use serde::{Deserialize, Serialize};

/// Core trait for all domain entities
pub trait Entity: Sized + Send + Sync + Clone {
    /// The type of the entity's unique identifier
    type Id: Clone + Eq + std::hash::Hash + std::fmt::Display + Send + Sync;

    /// Human readable entity name used in error messages
    const KIND: &'static str;

    /// Returns the entity's unique identifier
    fn id(&self) -> Self::Id;
}

/// Index of the entity with `id`, or `NotFound`
pub fn position_of<T: Entity>(items: &[T], id: &T::Id) -> DomainResult<usize> {
    items
        .iter()
        .position(|item| &item.id() == id)
        .ok_or_else(|| DomainError::NotFound(format!("{} {}", T::KIND, id)))
}

/// Move the element at `from` to `to`, shifting the ones in between
pub fn move_index<T>(items: &mut Vec<T>, from: usize, to: usize) -> DomainResult<()> {
    let len = items.len();
    if from >= len || to >= len {
        return Err(DomainError::InvalidInput(format!(
            "index out of range: from={} to={} len={}",
            from, to, len
        )));
    }
    if from != to {
        let moved = items.remove(from);
        items.insert(to, moved);
    }
    Ok(())
}

/// Common result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level errors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DomainError {
    NotFound(String),
    InvalidInput(String),
    Conflict(String),
    Internal(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainError::NotFound(msg) => write!(f, "Not found: {}", msg),
            DomainError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            DomainError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            DomainError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}
