//! In-memory record storage

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use super::{Record, RecordStore};
use crate::{Error, Result};

/// Record store kept entirely in memory.
///
/// Used by tests and by `Desk::in_memory`. Writes can be switched to fail
/// so callers can exercise storage error paths.
pub struct MemoryStore<T> {
    records: RwLock<Vec<T>>,
    fail_writes: AtomicBool,
}

impl<T: Record> MemoryStore<T> {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    pub fn with_records(records: Vec<T>) -> Self {
        Self {
            records: RwLock::new(records),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Make every subsequent `save_all` fail with a storage error
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl<T: Record> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Record> RecordStore<T> for MemoryStore<T> {
    async fn load_all(&self) -> Vec<T> {
        self.records.read().await.clone()
    }

    async fn save_all(&self, records: &[T]) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::Storage(format!(
                "{} store is not writable",
                T::KIND
            )));
        }
        *self.records.write().await = records.to_vec();
        Ok(())
    }
}
