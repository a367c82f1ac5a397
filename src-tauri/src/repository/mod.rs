//! Repository Layer
//!
//! Data access abstractions and implementations.

mod traits;
mod json_store;


pub use traits::DocumentStore;
pub use json_store::JsonFileStore;
