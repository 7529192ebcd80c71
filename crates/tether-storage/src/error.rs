use tether_core::ValidationError;
use tether_generator::GeneratorError;
use thiserror::Error;

/// Result type for mapping store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Generator(#[from] GeneratorError),
    #[error("short code not found: {0}")]
    NotFound(String),
    #[error("short code expired: {0}")]
    Expired(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
}
