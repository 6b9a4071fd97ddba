//! # Credential Auth
//!
//! Registration, password authentication and stateless access tokens.
//!
//! The crate is built from three leaf components and one orchestrator:
//!
//! - **CredentialStore**: principal → hashed-credential records with atomic,
//!   uniqueness-enforcing inserts
//! - **PasswordHasher**: salted Argon2id hashing with constant-time verification
//! - **TokenCodec**: HS256-signed, expiring tokens carrying a subject claim
//! - **AuthSystem**: register / login / verify-token on top of the three
//!
//! ## Core Modules
//!
//! - [`auth`]: the orchestrator and the caller-facing error taxonomy
//! - [`credentials`]: credential records, stores and hashers
//! - [`token`]: token claims and the signing codec
//! - [`config`]: configuration built in code or from environment variables
//!
//! ## Example
//!
//! ```no_run
//! use credential_auth::{AuthConfig, AuthSystem, SigningKey};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let key = SigningKey::new("an-example-signing-key-of-32-bytes!!")?;
//!     let auth = AuthSystem::new(AuthConfig::new(key))?;
//!
//!     auth.register("alice", "correct horse battery staple").await?;
//!     let token = auth.login("alice", "correct horse battery staple").await?;
//!     let claims = auth.verify_token(&token)?;
//!     assert_eq!(claims.sub, "alice");
//!     Ok(())
//! }
//! ```

/// Orchestration of registration, login and token verification.
pub mod auth;
pub use auth::{AuthError, AuthResult, AuthSystem, Principal};

/// Configuration surface.
pub mod config;
pub use config::{AuthConfig, ConfigError, HashCost, SigningKey};

/// Credential records, storage and password hashing.
pub mod credentials;
pub use credentials::{
    Argon2Hasher, CredentialHash, CredentialRecord, CredentialStore, InMemoryCredentialStore,
    PasswordHasher,
};

/// Signed, expiring access tokens.
pub mod token;
pub use token::{TokenClaims, TokenCodec, TokenError};
