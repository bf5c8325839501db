//! Typed access to the store through the `Entity` record shapes.

use rb_core::RecordId;
use rb_schema::Entity;
use serde::Serialize;
use serde_json::Value;

use crate::record::{OrderBy, Record, RecordStore};
use crate::{StoreError, StoreResult};

fn to_record<T: Serialize + ?Sized>(value: &T) -> StoreResult<Record> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::InvalidRecord(format!(
            "expected a JSON object, got {}",
            other
        ))),
    }
}

fn from_record<T: Entity>(record: Record) -> StoreResult<T> {
    Ok(serde_json::from_value(Value::Object(record))?)
}

/// Convenience layer over any [`RecordStore`].
pub trait TypedStore: RecordStore {
    fn list_all<T: Entity>(&self, order: OrderBy) -> StoreResult<Vec<T>> {
        self.list(T::COLLECTION, order)?
            .into_iter()
            .map(from_record)
            .collect()
    }

    fn fetch<T: Entity>(&self, id: &RecordId) -> StoreResult<T> {
        from_record(self.get(T::COLLECTION, id)?)
    }

    /// Insert `entity`; a blank id is generated by the store.
    fn insert_entity<T: Entity>(&self, entity: &T) -> StoreResult<T> {
        let record = to_record(entity)?;
        from_record(self.insert(T::COLLECTION, record)?)
    }

    /// Overwrite every field of the stored record with `entity`'s. Fields
    /// the entity leaves out (cleared options) are nulled.
    fn update_entity<T: Entity>(&self, entity: &T) -> StoreResult<T> {
        let mut record = to_record(entity)?;
        let current = self.get(T::COLLECTION, entity.id())?;
        for key in current.keys() {
            if !record.contains_key(key) {
                record.insert(key.clone(), Value::Null);
            }
        }
        from_record(self.update(T::COLLECTION, entity.id(), record)?)
    }

    fn delete_entity<T: Entity>(&self, id: &RecordId) -> StoreResult<()> {
        self.delete(T::COLLECTION, id)
    }
}

impl<S: RecordStore + ?Sized> TypedStore for S {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use rb_schema::Escort;

    fn escort(id: &str) -> Escort {
        Escort {
            id: RecordId::new(id),
            created_at: String::new(),
            first_name: "Avi".to_string(),
            last_name: "Mizrahi".to_string(),
            phone: "0521234567".to_string(),
            notes: None,
        }
    }

    #[test]
    fn typed_insert_assigns_identity() {
        let store = MemoryStore::new();
        let stored = store.insert_entity(&escort("")).unwrap();
        assert!(!stored.id.is_blank());
        assert!(!stored.created_at.is_empty());

        let fetched: Escort = store.fetch(&stored.id).unwrap();
        assert_eq!(fetched, stored);
    }

    #[test]
    fn typed_update_keeps_created_at() {
        let store = MemoryStore::new();
        let stored = store.insert_entity(&escort("e1")).unwrap();

        let mut changed = stored.clone();
        changed.notes = Some("prefers front seat".to_string());
        changed.created_at = "overwritten?".to_string();
        let updated = store.update_entity(&changed).unwrap();

        assert_eq!(updated.created_at, stored.created_at);
        assert_eq!(updated.notes.as_deref(), Some("prefers front seat"));
    }

    #[test]
    fn typed_update_clears_removed_options() {
        let store = MemoryStore::new();
        let mut with_notes = escort("e1");
        with_notes.notes = Some("allergic to dogs".to_string());
        let stored = store.insert_entity(&with_notes).unwrap();

        let mut cleared = stored.clone();
        cleared.notes = None;
        let updated = store.update_entity(&cleared).unwrap();
        assert_eq!(updated.notes, None);
    }

    #[test]
    fn dyn_store_gets_typed_access() {
        let store = MemoryStore::new();
        let dyn_store: &dyn RecordStore = &store;
        dyn_store.insert_entity(&escort("e1")).unwrap();
        let all: Vec<Escort> = dyn_store.list_all(OrderBy::CreatedAtDesc).unwrap();
        assert_eq!(all.len(), 1);
    }
}
