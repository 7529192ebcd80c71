use tether_core::{PersistenceError, ValidationError};
use tether_generator::GeneratorError;
use tether_storage::StoreError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors surfaced to callers of the engine. Each one fails a single request.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// No active mapping is reachable under this code. Expired aliases are
    /// reported this way as well.
    #[error("short code not found: {0}")]
    NotFound(String),
    #[error("no free short code found after {attempts} attempts")]
    CapacityExhausted { attempts: usize },
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
}

impl From<GeneratorError> for EngineError {
    fn from(value: GeneratorError) -> Self {
        match value {
            GeneratorError::CapacityExhausted { attempts } => Self::CapacityExhausted { attempts },
        }
    }
}

impl From<StoreError> for EngineError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Validation(err) => Self::Validation(err),
            StoreError::Generator(err) => err.into(),
            StoreError::NotFound(code) | StoreError::Expired(code) => Self::NotFound(code),
            StoreError::InvalidData(message) => Self::InvalidData(message),
        }
    }
}
