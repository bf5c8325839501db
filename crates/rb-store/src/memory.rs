//! In-process record store, used for tests and throwaway sessions.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use rb_core::RecordId;
use rb_schema::Collection;

use crate::record::{OrderBy, Record, RecordStore, apply_patch, prepare_insert, sort_records};
use crate::{StoreError, StoreResult};

type Tables = BTreeMap<Collection, BTreeMap<RecordId, Record>>;

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// While offline every call fails with [`StoreError::Unavailable`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Relaxed);
    }

    pub fn len(&self, collection: Collection) -> usize {
        self.tables
            .lock()
            .map(|t| t.get(&collection).map_or(0, BTreeMap::len))
            .unwrap_or(0)
    }

    pub fn is_empty(&self, collection: Collection) -> bool {
        self.len(collection) == 0
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Tables>> {
        if self.offline.load(Ordering::Relaxed) {
            return Err(StoreError::Unavailable {
                message: "store is offline".to_string(),
            });
        }
        self.tables.lock().map_err(|_| StoreError::Unavailable {
            message: "store lock poisoned".to_string(),
        })
    }
}

fn not_found(collection: Collection, id: &RecordId) -> StoreError {
    StoreError::NotFound {
        collection: collection.name().to_string(),
        id: id.to_string(),
    }
}

impl RecordStore for MemoryStore {
    fn list(&self, collection: Collection, order: OrderBy) -> StoreResult<Vec<Record>> {
        let tables = self.lock()?;
        let mut records: Vec<Record> = tables
            .get(&collection)
            .map(|t| t.values().cloned().collect())
            .unwrap_or_default();
        sort_records(&mut records, order);
        Ok(records)
    }

    fn get(&self, collection: Collection, id: &RecordId) -> StoreResult<Record> {
        let tables = self.lock()?;
        tables
            .get(&collection)
            .and_then(|t| t.get(id))
            .cloned()
            .ok_or_else(|| not_found(collection, id))
    }

    fn insert(&self, collection: Collection, record: Record) -> StoreResult<Record> {
        let mut tables = self.lock()?;
        let (id, record) = prepare_insert(collection, record)?;
        let table = tables.entry(collection).or_default();
        if table.contains_key(&id) {
            return Err(StoreError::Duplicate {
                collection: collection.name().to_string(),
                id: id.to_string(),
            });
        }
        table.insert(id, record.clone());
        Ok(record)
    }

    fn update(
        &self,
        collection: Collection,
        id: &RecordId,
        patch: Record,
    ) -> StoreResult<Record> {
        let mut tables = self.lock()?;
        let record = tables
            .get_mut(&collection)
            .and_then(|t| t.get_mut(id))
            .ok_or_else(|| not_found(collection, id))?;
        apply_patch(record, patch);
        Ok(record.clone())
    }

    fn delete(&self, collection: Collection, id: &RecordId) -> StoreResult<()> {
        let mut tables = self.lock()?;
        if let Some(table) = tables.get_mut(&collection) {
            table.remove(id);
        }
        Ok(())
    }
}
