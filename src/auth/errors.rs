//! Authentication error types.

use crate::{
    config::ConfigError,
    credentials::{HashError, StoreError},
    token::TokenError,
};
use thiserror::Error;

/// Authentication errors
///
/// No variant carries a secret, a credential hash, a token or key material.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Identifier already registered
    #[error("Identifier already exists")]
    UserAlreadyExists,

    /// Secret was empty
    #[error("Secret must not be empty")]
    EmptySecret,

    /// Identifier or secret rejected before any side effect
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unknown identifier or wrong secret; deliberately indistinguishable
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Malformed, badly signed or expired token; deliberately indistinguishable
    #[error("Invalid token")]
    InvalidToken,

    /// Password hashing failed
    #[error("Password hashing failed")]
    HashingFailed,

    /// Token could not be issued
    #[error("Token error: {0}")]
    Token(TokenError),

    /// Storage backend error
    #[error("Storage error: {0}")]
    Store(StoreError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl AuthError {
    /// Get a client-safe error message that doesn't leak sensitive information
    ///
    /// Storage, hashing, signing and configuration failures are sanitized to
    /// avoid disclosing internal structure.
    pub fn client_message(&self) -> String {
        match self {
            AuthError::HashingFailed
            | AuthError::Token(_)
            | AuthError::Store(_)
            | AuthError::Config(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AlreadyExists => AuthError::UserAlreadyExists,
            other => AuthError::Store(other),
        }
    }
}

impl From<HashError> for AuthError {
    fn from(err: HashError) -> Self {
        match err {
            HashError::EmptySecret => AuthError::EmptySecret,
            HashError::Failed => AuthError::HashingFailed,
        }
    }
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;
