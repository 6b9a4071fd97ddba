//! Token data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Claims carried inside an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String, // Principal identifier
    pub iat: i64,    // Issued at timestamp
    pub exp: i64,    // Expiration timestamp
}

impl TokenClaims {
    pub fn subject(&self) -> &str {
        &self.sub
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}
