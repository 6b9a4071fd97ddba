//! Error types for the credentials module

use thiserror::Error;

/// Result type for credential store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Credential store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Identifier already registered
    #[error("Identifier already exists")]
    AlreadyExists,

    /// Identifier not registered
    #[error("Identifier not found")]
    NotFound,

    /// Storage backend failure
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Result type for password hashing operations
pub type HashResult<T> = Result<T, HashError>;

/// Password hashing errors
#[derive(Debug, Error)]
pub enum HashError {
    /// Secret was empty
    #[error("Secret must not be empty")]
    EmptySecret,

    /// The hashing primitive rejected its inputs
    #[error("Password hashing failed")]
    Failed,
}
