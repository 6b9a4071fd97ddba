//! Credential data models.

use chrono::{DateTime, Utc};
use std::fmt;

/// One-way digest of a secret, with its salt and cost parameters embedded.
///
/// Holds a PHC-format string (`$argon2id$v=19$m=..,t=..,p=..$salt$hash`).
/// `Debug` never prints the contents.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialHash {
    phc: String,
}

impl CredentialHash {
    /// Wrap a PHC string loaded from a storage backend
    pub fn from_phc(phc: impl Into<String>) -> Self {
        Self { phc: phc.into() }
    }

    /// Encoded form for storage backends that persist records.
    ///
    /// Never hand this to an untrusted caller.
    pub fn as_phc(&self) -> &str {
        &self.phc
    }
}

impl fmt::Debug for CredentialHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CredentialHash(<redacted>)")
    }
}

/// Stored principal record
#[derive(Debug, Clone)]
pub struct CredentialRecord {
    identifier: String,
    credential: CredentialHash,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CredentialRecord {
    /// Create a record for a freshly hashed credential
    pub fn new(identifier: impl Into<String>, credential: CredentialHash) -> Self {
        let now = Utc::now();
        Self {
            identifier: identifier.into(),
            credential,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a record loaded from a storage backend
    pub fn from_parts(
        identifier: String,
        credential: CredentialHash,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            identifier,
            credential,
            created_at,
            updated_at,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn credential(&self) -> &CredentialHash {
        &self.credential
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Same record with the whole credential swapped out
    pub fn with_credential(&self, credential: CredentialHash) -> Self {
        Self {
            identifier: self.identifier.clone(),
            credential,
            created_at: self.created_at,
            updated_at: Utc::now(),
        }
    }
}
