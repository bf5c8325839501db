use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid pickup time: '{value}' (expected HH:MM)")]
    InvalidTime { value: String },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}
