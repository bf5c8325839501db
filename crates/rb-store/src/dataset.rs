//! Whole-store export and import through the versioned dataset document.

use rb_schema::{Dataset, Entity, LATEST_VERSION};

use crate::record::{OrderBy, RecordStore};
use crate::typed::TypedStore;
use crate::StoreResult;

pub fn export_dataset<S: RecordStore + ?Sized>(store: &S) -> StoreResult<Dataset> {
    Ok(Dataset {
        version: LATEST_VERSION,
        children: store.list_all(OrderBy::CreatedAtAsc)?,
        institutions: store.list_all(OrderBy::CreatedAtAsc)?,
        authorities: store.list_all(OrderBy::CreatedAtAsc)?,
        drivers: store.list_all(OrderBy::CreatedAtAsc)?,
        escorts: store.list_all(OrderBy::CreatedAtAsc)?,
        routes: store.list_all(OrderBy::CreatedAtAsc)?,
    })
}

/// Upsert every record of `dataset`. Returns the number of records written.
/// Sub-items without an id get one before they are stored.
pub fn import_dataset<S: RecordStore + ?Sized>(store: &S, dataset: &Dataset) -> StoreResult<usize> {
    let mut written = 0;
    written += upsert_all(store, &dataset.children)?;
    written += upsert_all(store, &dataset.institutions)?;
    written += upsert_all(store, &dataset.authorities)?;
    written += upsert_all(store, &dataset.drivers)?;
    written += upsert_all(store, &dataset.escorts)?;
    written += upsert_all(store, &dataset.routes)?;
    Ok(written)
}

fn upsert_all<S: RecordStore + ?Sized, T: Entity>(store: &S, records: &[T]) -> StoreResult<usize> {
    for record in records {
        let mut record = record.clone();
        record.assign_sub_item_ids();
        match store.get(T::COLLECTION, record.id()) {
            Ok(_) => {
                store.update_entity(&record)?;
            }
            Err(e) if e.is_not_found() => {
                store.insert_entity(&record)?;
            }
            Err(e) => return Err(e),
        }
    }
    Ok(records.len())
}
