//! Credential storage.
//!
//! Trait-based abstraction over the record store so persistent backends can
//! be swapped in; the in-memory implementation backs tests and single-process
//! deployments.

use super::{
    errors::{StoreError, StoreResult},
    models::{CredentialHash, CredentialRecord},
};
use async_trait::async_trait;
use std::collections::{HashMap, hash_map::Entry};
use tokio::sync::RwLock;

/// Principal → credential record storage
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert a new record.
    ///
    /// Check and insert must be one atomic step: of two concurrent calls for
    /// the same identifier exactly one succeeds.
    ///
    /// # Errors
    ///
    /// * `StoreError::AlreadyExists` - Identifier already registered; store unchanged
    async fn register(&self, record: CredentialRecord) -> StoreResult<()>;

    /// Find record by identifier
    async fn lookup(&self, identifier: &str) -> StoreResult<Option<CredentialRecord>>;

    /// Replace the credential of an existing record
    ///
    /// # Errors
    ///
    /// * `StoreError::NotFound` - Identifier not registered
    async fn replace_credential(
        &self,
        identifier: &str,
        credential: CredentialHash,
    ) -> StoreResult<()>;

    /// Remove a record, returning whether one existed
    async fn remove(&self, identifier: &str) -> StoreResult<bool>;
}

/// In-memory `CredentialStore`
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    records: RwLock<HashMap<String, CredentialRecord>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered principals
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn register(&self, record: CredentialRecord) -> StoreResult<()> {
        // Single write lock covers both the presence check and the insert
        let mut records = self.records.write().await;

        match records.entry(record.identifier().to_string()) {
            Entry::Occupied(_) => Err(StoreError::AlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }

    async fn lookup(&self, identifier: &str) -> StoreResult<Option<CredentialRecord>> {
        Ok(self.records.read().await.get(identifier).cloned())
    }

    async fn replace_credential(
        &self,
        identifier: &str,
        credential: CredentialHash,
    ) -> StoreResult<()> {
        let mut records = self.records.write().await;
        let record = records.get_mut(identifier).ok_or(StoreError::NotFound)?;
        *record = record.with_credential(credential);
        Ok(())
    }

    async fn remove(&self, identifier: &str) -> StoreResult<bool> {
        Ok(self.records.write().await.remove(identifier).is_some())
    }
}
