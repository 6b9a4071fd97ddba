//! Credential records, storage and password hashing.
//!
//! - [`CredentialStore`] keeps principal → hash records and enforces unique
//!   identifiers with an atomic check-and-insert
//! - [`PasswordHasher`] is the hashing capability; [`Argon2Hasher`] implements
//!   it with Argon2id, a fresh salt per hash and an optional pepper
//!
//! Hashes are opaque [`CredentialHash`] values whose `Debug` output is redacted.

pub mod errors;
pub mod hasher;
pub mod models;
pub mod store;

pub use errors::{HashError, HashResult, StoreError, StoreResult};
pub use hasher::{Argon2Hasher, PasswordHasher};
pub use models::{CredentialHash, CredentialRecord};
pub use store::{CredentialStore, InMemoryCredentialStore};
