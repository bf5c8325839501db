//! Directory-backed record store: one JSON file per record.
//!
//! Layout: `<root>/<collection>/<id>.json`.

use std::fs;
use std::path::{Path, PathBuf};

use rb_core::RecordId;
use rb_schema::Collection;
use serde_json::Value;

use crate::record::{OrderBy, Record, RecordStore, apply_patch, prepare_insert, sort_records};
use crate::{StoreError, StoreResult};

#[derive(Clone, Debug)]
pub struct FileStore {
    root_dir: PathBuf,
}

impl FileStore {
    pub fn new(root_dir: PathBuf) -> StoreResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    fn collection_dir(&self, collection: Collection) -> PathBuf {
        self.root_dir.join(collection.name())
    }

    fn record_path(&self, collection: Collection, id: &RecordId) -> StoreResult<PathBuf> {
        let raw = id.as_str();
        let safe = !raw.is_empty()
            && raw != "."
            && raw != ".."
            && !raw.contains(['/', '\\'])
            && !raw.contains('\0');
        if !safe {
            return Err(StoreError::InvalidRecord(format!(
                "{}: id '{}' cannot be used as a file name",
                collection, raw
            )));
        }
        Ok(self.collection_dir(collection).join(format!("{}.json", raw)))
    }

    fn read_record(path: &Path) -> StoreResult<Record> {
        let content = fs::read_to_string(path)?;
        match serde_json::from_str(&content)? {
            Value::Object(map) => Ok(map),
            _ => Err(StoreError::InvalidRecord(format!(
                "{} does not hold a JSON object",
                path.display()
            ))),
        }
    }

    fn write_record(path: &Path, record: &Record) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(record)?;
        fs::write(path, json)?;
        Ok(())
    }
}

impl RecordStore for FileStore {
    fn list(&self, collection: Collection, order: OrderBy) -> StoreResult<Vec<Record>> {
        let mut records = Vec::new();
        let dir = self.collection_dir(collection);

        if !dir.exists() {
            return Ok(records);
        }

        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                records.push(Self::read_record(&path)?);
            }
        }

        sort_records(&mut records, order);
        Ok(records)
    }

    fn get(&self, collection: Collection, id: &RecordId) -> StoreResult<Record> {
        let path = self.record_path(collection, id)?;
        if !path.exists() {
            return Err(StoreError::NotFound {
                collection: collection.name().to_string(),
                id: id.to_string(),
            });
        }
        Self::read_record(&path)
    }

    fn insert(&self, collection: Collection, record: Record) -> StoreResult<Record> {
        let (id, record) = prepare_insert(collection, record)?;
        let path = self.record_path(collection, &id)?;
        if path.exists() {
            return Err(StoreError::Duplicate {
                collection: collection.name().to_string(),
                id: id.to_string(),
            });
        }

        fs::create_dir_all(self.collection_dir(collection))?;
        Self::write_record(&path, &record)?;
        Ok(record)
    }

    fn update(
        &self,
        collection: Collection,
        id: &RecordId,
        patch: Record,
    ) -> StoreResult<Record> {
        let mut record = self.get(collection, id)?;
        apply_patch(&mut record, patch);
        Self::write_record(&self.record_path(collection, id)?, &record)?;
        Ok(record)
    }

    fn delete(&self, collection: Collection, id: &RecordId) -> StoreResult<()> {
        let path = self.record_path(collection, id)?;
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}
