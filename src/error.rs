use thiserror::Error;

/// Errors that can occur during backend operations
#[derive(Error, Debug)]
pub enum CooksyError {
    /// Input was rejected before touching state
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Referenced entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Record storage could not be written
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Snapshot could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    /// Configured advisor name is not known
    #[error("Unknown advisor: {0}")]
    UnknownAdvisor(String),
}

impl CooksyError {
    pub fn is_validation(&self) -> bool {
        matches!(self, CooksyError::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CooksyError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, CooksyError>;
