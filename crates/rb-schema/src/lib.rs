//! rb-schema: persisted record shapes, validation, and the dataset file format.

pub mod migrate;
pub mod schema;
pub mod validate;

pub use migrate::{LATEST_VERSION, migrate_to_latest};
pub use schema::*;
pub use validate::{
    MAX_ASSIGNED_INSTITUTIONS, MAX_PARENTS, MAX_ROUTE_CHILDREN, ValidationError, validate_dataset,
};

pub type SchemaResult<T> = Result<T, SchemaError>;

#[derive(thiserror::Error, Debug)]
pub enum SchemaError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Migration error: {what}")]
    Migration { what: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &std::path::Path) -> SchemaResult<Dataset> {
    let content = std::fs::read_to_string(path)?;
    let mut dataset: Dataset = serde_yaml::from_str(&content)?;
    dataset = migrate_to_latest(dataset)?;
    validate_dataset(&dataset)?;
    Ok(dataset)
}

pub fn save_yaml(path: &std::path::Path, dataset: &Dataset) -> SchemaResult<()> {
    validate_dataset(dataset)?;
    let content = serde_yaml::to_string(dataset)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> SchemaResult<Dataset> {
    let content = std::fs::read_to_string(path)?;
    let mut dataset: Dataset = serde_json::from_str(&content)?;
    dataset = migrate_to_latest(dataset)?;
    validate_dataset(&dataset)?;
    Ok(dataset)
}

pub fn save_json(path: &std::path::Path, dataset: &Dataset) -> SchemaResult<()> {
    validate_dataset(dataset)?;
    let content = serde_json::to_string_pretty(dataset)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Pick the format from the file extension (`.yaml`/`.yml`, otherwise JSON).
pub fn load_dataset(path: &std::path::Path) -> SchemaResult<Dataset> {
    if is_yaml(path) {
        load_yaml(path)
    } else {
        load_json(path)
    }
}

pub fn save_dataset(path: &std::path::Path, dataset: &Dataset) -> SchemaResult<()> {
    if is_yaml(path) {
        save_yaml(path, dataset)
    } else {
        save_json(path, dataset)
    }
}

fn is_yaml(path: &std::path::Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}
