//! Token error types.

use thiserror::Error;

/// Result type for token operations
pub type TokenResult<T> = Result<T, TokenError>;

/// Token issue and verification errors.
///
/// The verification variants are for operator diagnostics; untrusted callers
/// only ever see them collapsed into `AuthError::InvalidToken`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Subject claim was empty
    #[error("Token subject must not be empty")]
    EmptySubject,

    /// Expiry does not fit in a timestamp
    #[error("Token lifetime out of range")]
    InvalidLifetime,

    /// Signing primitive failed
    #[error("Token signing failed")]
    Signing,

    /// Wrong structure, bad encoding, unexpected algorithm or truncated input
    #[error("Malformed token")]
    Malformed,

    /// Signature does not match the claims under the current key
    #[error("Bad token signature")]
    BadSignature,

    /// Signature valid but expiry has passed
    #[error("Token expired")]
    Expired,

    /// Issue time lies further ahead than the configured clock skew tolerance
    #[error("Token issued in the future")]
    IssuedInFuture,
}
