//! Id-addressed operations over a record store

use std::collections::HashSet;
use std::sync::Arc;

use super::{Record, RecordStore};
use crate::{Error, Result};

/// Records removed by [`Collection::remove_many`]
#[derive(Debug, Clone)]
pub struct Removal<T> {
    pub removed: Vec<T>,
    pub missing: Vec<u64>,
}

/// CRUD helpers on top of a whole-collection store.
///
/// Every mutation loads the full collection, edits it in memory and writes
/// it back in one `save_all` call.
pub struct Collection<T: Record> {
    store: Arc<dyn RecordStore<T>>,
}

impl<T: Record> Collection<T> {
    pub fn new(store: Arc<dyn RecordStore<T>>) -> Self {
        Self { store }
    }

    /// All records in ascending id order
    pub async fn all(&self) -> Vec<T> {
        let mut records = self.store.load_all().await;
        records.sort_by_key(|r| r.id());
        records
    }

    pub async fn get(&self, id: u64) -> Result<T> {
        self.all()
            .await
            .into_iter()
            .find(|r| r.id() == id)
            .ok_or_else(|| Error::not_found(T::KIND, id))
    }

    /// Append a record built from the next free id
    pub async fn insert_with<F>(&self, build: F) -> Result<T>
    where
        F: FnOnce(u64) -> T + Send,
    {
        let mut records = self.all().await;
        let id = next_id(&records)?;
        let record = build(id);
        records.push(record.clone());
        self.store.save_all(&records).await?;
        Ok(record)
    }

    /// Edit one record in place and persist the collection
    pub async fn update_with<F>(&self, id: u64, apply: F) -> Result<T>
    where
        F: FnOnce(&mut T) + Send,
    {
        let mut records = self.all().await;
        let updated = {
            let record = records
                .iter_mut()
                .find(|r| r.id() == id)
                .ok_or_else(|| Error::not_found(T::KIND, id))?;
            apply(record);
            record.clone()
        };
        self.store.save_all(&records).await?;
        Ok(updated)
    }

    pub async fn remove(&self, id: u64) -> Result<T> {
        let mut records = self.all().await;
        let index = records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| Error::not_found(T::KIND, id))?;
        let removed = records.remove(index);
        self.store.save_all(&records).await?;
        Ok(removed)
    }

    /// Remove every record whose id is in `ids` with a single write.
    ///
    /// Ids that match nothing are reported in `missing`; duplicates in
    /// `ids` are counted once. Nothing is written when no id matched.
    pub async fn remove_many(&self, ids: &[u64]) -> Result<Removal<T>> {
        let mut seen = HashSet::new();
        let wanted: Vec<u64> = ids.iter().copied().filter(|id| seen.insert(*id)).collect();

        let records = self.all().await;
        let (removed, kept): (Vec<T>, Vec<T>) = records
            .into_iter()
            .partition(|r| wanted.contains(&r.id()));

        let missing = wanted
            .into_iter()
            .filter(|id| !removed.iter().any(|r| r.id() == *id))
            .collect();

        if !removed.is_empty() {
            self.store.save_all(&kept).await?;
        }
        Ok(Removal { removed, missing })
    }

    pub async fn replace_all(&self, records: &[T]) -> Result<()> {
        self.store.save_all(records).await
    }
}

fn next_id<T: Record>(records: &[T]) -> Result<u64> {
    let highest = records.iter().map(|r| r.id()).max().unwrap_or(0);
    highest
        .checked_add(1)
        .ok_or_else(|| Error::Storage(format!("No {} ids left after {}", T::KIND, highest)))
}
