//! Record store trait
//!
//! Defines the interface for whole-collection storage.

use async_trait::async_trait;

use super::Record;
use crate::Result;

/// Storage backend for one entity collection
#[async_trait]
pub trait RecordStore<T: Record>: Send + Sync {
    /// Load every record.
    ///
    /// A missing or unreadable backing store yields an empty collection.
    async fn load_all(&self) -> Vec<T>;

    /// Replace the stored collection with `records`
    async fn save_all(&self, records: &[T]) -> Result<()>;
}
