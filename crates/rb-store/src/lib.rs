//! rb-store: the record store seam and its file-backed and in-memory backends.

pub mod dataset;
pub mod file;
pub mod hash;
pub mod memory;
pub mod record;
pub mod typed;

pub use dataset::{export_dataset, import_dataset};
pub use file::FileStore;
pub use hash::compute_snapshot_digest;
pub use memory::MemoryStore;
pub use record::{OrderBy, Record, RecordStore};
pub use typed::TypedStore;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Record not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    #[error("Duplicate record: {collection}/{id}")]
    Duplicate { collection: String, id: String },

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Store unavailable: {message}")]
    Unavailable { message: String },
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}
