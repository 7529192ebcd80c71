use thiserror::Error;

/// Reasons a create request is rejected before anything is stored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("alias must be between {min} and {max} characters, got {len}")]
    InvalidLength { len: usize, min: usize, max: usize },
    #[error("alias can only contain letters, numbers, and hyphens: '{0}'")]
    InvalidCharacters(String),
    #[error("alias cannot start or end with a hyphen: '{0}'")]
    InvalidFormat(String),
    #[error("alias is a reserved keyword: '{0}'")]
    ReservedKeyword(String),
    #[error("alias already exists: {0}")]
    AliasTaken(String),
}

/// Errors reported by a [`Persistence`](crate::Persistence) provider.
#[derive(Debug, Clone, Error)]
pub enum PersistenceError {
    #[error("persistence io failed: {0}")]
    Io(String),
    #[error("persisted state could not be (de)serialized: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for PersistenceError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value.to_string())
    }
}
