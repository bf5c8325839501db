//! Error types for the rb-app service layer.

use std::path::PathBuf;

use crate::route_build::RouteError;

/// Application error type that wraps errors from the backend crates and
/// gives the CLI a single error surface.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Route(#[from] RouteError),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Failed to read config file: {path}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Preference error: {0}")]
    Preference(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for rb-app operations.
pub type AppResult<T> = Result<T, AppError>;

// Conversions from backend error types
impl From<rb_store::StoreError> for AppError {
    fn from(err: rb_store::StoreError) -> Self {
        use rb_store::StoreError;

        match err {
            StoreError::NotFound { .. } => AppError::NotFound(err.to_string()),
            StoreError::Duplicate { .. } => AppError::Validation(err.to_string()),
            StoreError::InvalidRecord(_) | StoreError::Json(_) => {
                AppError::InvalidInput(err.to_string())
            }
            StoreError::Io(_) | StoreError::Unavailable { .. } => {
                AppError::StoreUnavailable(err.to_string())
            }
        }
    }
}

impl From<rb_schema::ValidationError> for AppError {
    fn from(err: rb_schema::ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<rb_schema::SchemaError> for AppError {
    fn from(err: rb_schema::SchemaError) -> Self {
        match err {
            rb_schema::SchemaError::Validation(v) => AppError::Validation(v.to_string()),
            other => AppError::Dataset(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rb_store::StoreError;

    #[test]
    fn store_failures_map_to_unavailable() {
        let err: AppError = StoreError::Unavailable {
            message: "connection refused".to_string(),
        }
        .into();
        assert!(matches!(err, AppError::StoreUnavailable(_)));

        let err: AppError = StoreError::NotFound {
            collection: "routes".to_string(),
            id: "r1".to_string(),
        }
        .into();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn rejected_records_are_not_outages() {
        let err: AppError = StoreError::InvalidRecord("bad id '../x'".to_string()).into();
        assert!(matches!(err, AppError::InvalidInput(_)));

        let err: AppError = StoreError::Duplicate {
            collection: "drivers".to_string(),
            id: "d1".to_string(),
        }
        .into();
        assert!(matches!(err, AppError::Validation(_)));

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: AppError = StoreError::Io(io).into();
        assert!(matches!(err, AppError::StoreUnavailable(_)));
    }
}
