use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A job record lacks a required field; the whole batch is rejected.
    #[error("job #{index} is missing required field `{field}`")]
    MissingField { index: usize, field: &'static str },

    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidConfig {
        key: String,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, CoreError>;
