//! Record storage
//!
//! Whole-collection persistence for tasks, notes and categories. A store
//! only knows how to load and replace an entire collection; id assignment
//! and lookups live in [`Collection`].

mod collection;
mod file_store;
mod memory_store;
mod store;

use serde::de::DeserializeOwned;
use serde::Serialize;

pub use collection::{Collection, Removal};
pub use file_store::JsonFileStore;
pub use memory_store::MemoryStore;
pub use store::RecordStore;

/// An entity persisted in a record store
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Human-readable entity name used in error messages
    const KIND: &'static str;

    fn id(&self) -> u64;
}
