use thiserror::Error;

/// Reasons a prefix/suffix pair cannot be used as search criteria.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CriteriaError {
    #[error("at least one of prefix or suffix must be given")]
    Empty,

    #[error("{field} is {len} characters long, addresses only have 64 hex digits")]
    TooLong { field: &'static str, len: usize },

    #[error("{field} contains invalid character '{ch}', use only 0-9 and a-f")]
    InvalidCharacter { field: &'static str, ch: char },
}

/// Failure of the keypair generation primitive.
#[derive(Error, Debug)]
pub enum KeygenError {
    #[error("entropy source failed: {0}")]
    Entropy(#[from] rand::Error),

    #[error("key generator failed: {0}")]
    Backend(String),
}

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("invalid criteria: {0}")]
    Criteria(#[from] CriteriaError),

    #[error("key generation failed, search stopped: {0}")]
    Generation(#[from] KeygenError),

    #[error("failed to spawn search worker: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SearchError>;
