//! Authentication data models.

use crate::credentials::CredentialRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Public view of a registered principal. Carries no credential material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub identifier: String,
    pub created_at: DateTime<Utc>,
}

impl From<&CredentialRecord> for Principal {
    fn from(record: &CredentialRecord) -> Self {
        Self {
            identifier: record.identifier().to_string(),
            created_at: record.created_at(),
        }
    }
}
