//! The record store contract.

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use rb_core::RecordId;
use rb_schema::Collection;
use serde_json::Value;

use crate::{StoreError, StoreResult};

/// A plain record as exchanged with the store: a JSON object.
pub type Record = serde_json::Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderBy {
    /// Newest first. Every listing screen uses this.
    #[default]
    CreatedAtDesc,
    CreatedAtAsc,
    Unordered,
}

/// Generic keyed-collection persistence.
///
/// Calls are independent: there is no transaction, no retry and no
/// optimistic concurrency. `update` is an unconditional update-by-id, so
/// concurrent writers silently overwrite each other (last write wins).
pub trait RecordStore {
    fn list(&self, collection: Collection, order: OrderBy) -> StoreResult<Vec<Record>>;

    fn get(&self, collection: Collection, id: &RecordId) -> StoreResult<Record>;

    /// Persist a new record. A missing or blank `id` is generated and a
    /// missing `created_at` is stamped; the stored record is returned.
    fn insert(&self, collection: Collection, record: Record) -> StoreResult<Record>;

    /// Shallow-merge `patch` into the stored record. `id` and `created_at`
    /// in the patch are ignored.
    fn update(&self, collection: Collection, id: &RecordId, patch: Record)
    -> StoreResult<Record>;

    /// Deleting a missing record is not an error.
    fn delete(&self, collection: Collection, id: &RecordId) -> StoreResult<()>;
}

pub(crate) fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn prepare_insert(
    collection: Collection,
    mut record: Record,
) -> StoreResult<(RecordId, Record)> {
    let id = match record.get("id") {
        None | Some(Value::Null) => RecordId::generate(),
        Some(Value::String(s)) if s.trim().is_empty() => RecordId::generate(),
        Some(Value::String(s)) => RecordId::new(s.clone()),
        Some(other) => {
            return Err(StoreError::InvalidRecord(format!(
                "{}: id must be a string, got {}",
                collection, other
            )));
        }
    };
    record.insert("id".to_string(), Value::String(id.to_string()));

    let needs_stamp = match record.get("created_at") {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    };
    if needs_stamp {
        record.insert("created_at".to_string(), Value::String(now_timestamp()));
    }

    Ok((id, record))
}

pub(crate) fn apply_patch(record: &mut Record, patch: Record) {
    for (key, value) in patch {
        if key == "id" || key == "created_at" {
            continue;
        }
        record.insert(key, value);
    }
}

fn created_at(record: &Record) -> (Option<DateTime<FixedOffset>>, &str) {
    let raw = record
        .get("created_at")
        .and_then(Value::as_str)
        .unwrap_or("");
    (DateTime::parse_from_rfc3339(raw).ok(), raw)
}

pub(crate) fn sort_records(records: &mut [Record], order: OrderBy) {
    match order {
        OrderBy::Unordered => {}
        OrderBy::CreatedAtAsc => records.sort_by(|a, b| created_at(a).cmp(&created_at(b))),
        OrderBy::CreatedAtDesc => records.sort_by(|a, b| created_at(b).cmp(&created_at(a))),
    }
}
