//! Authentication system implementation.

use super::{
    errors::{AuthError, AuthResult},
    models::Principal,
};
use crate::{
    config::{AuthConfig, MAX_IDENTIFIER_LEN, MAX_SECRET_LEN},
    credentials::{
        Argon2Hasher, CredentialHash, CredentialRecord, CredentialStore, InMemoryCredentialStore,
        PasswordHasher, StoreError,
    },
    token::{TokenClaims, TokenCodec},
};
use chrono::Duration;
use std::sync::Arc;
use subtle::Choice;

/// Verified in place of a real credential when the identifier is unknown
const DUMMY_SECRET: &str = "dummy-secret-for-unknown-principals";

/// Authentication system
#[derive(Clone)]
pub struct AuthSystem {
    store: Arc<dyn CredentialStore>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: TokenCodec,
    token_ttl: Duration,
    dummy_credential: CredentialHash,
}

impl AuthSystem {
    /// Create an authentication system backed by an in-memory store
    ///
    /// # Errors
    ///
    /// * `AuthError::Config` - Configuration failed validation
    /// * `AuthError::HashingFailed` - Hasher could not be built
    pub fn new(config: AuthConfig) -> AuthResult<Self> {
        Self::with_store(config, Arc::new(InMemoryCredentialStore::new()))
    }

    /// Create an authentication system on top of an existing store
    pub fn with_store(config: AuthConfig, store: Arc<dyn CredentialStore>) -> AuthResult<Self> {
        config.validate()?;

        let hasher = Arc::new(Argon2Hasher::from_config(&config)?);
        let tokens = TokenCodec::from_config(&config);

        Self::from_parts(store, hasher, tokens, config.token_ttl)
    }

    /// Assemble an authentication system from its components
    ///
    /// # Arguments
    ///
    /// * `store` - Credential record storage
    /// * `hasher` - Password hashing capability
    /// * `tokens` - Token codec holding the signing key
    /// * `token_ttl` - Lifetime of tokens issued by `login`
    pub fn from_parts(
        store: Arc<dyn CredentialStore>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: TokenCodec,
        token_ttl: Duration,
    ) -> AuthResult<Self> {
        if token_ttl <= Duration::zero() {
            return Err(AuthError::InvalidInput(
                "Token lifetime must be greater than 0".to_string(),
            ));
        }

        // Same cost as real hashes so unknown identifiers take as long to reject
        let dummy_credential = hasher.hash(DUMMY_SECRET)?;

        Ok(Self {
            store,
            hasher,
            tokens,
            token_ttl,
            dummy_credential,
        })
    }

    /// Lifetime of tokens issued by `login`
    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// Register a new principal
    ///
    /// # Arguments
    ///
    /// * `identifier` - Unique principal identifier
    /// * `secret` - Plaintext secret; only its hash is kept
    ///
    /// # Returns
    ///
    /// * `AuthResult<Principal>` - Public view of the new principal
    ///
    /// # Errors
    ///
    /// * `AuthError::InvalidInput` - Identifier or secret out of bounds
    /// * `AuthError::EmptySecret` - Secret is empty
    /// * `AuthError::UserAlreadyExists` - Identifier already registered
    pub async fn register(&self, identifier: &str, secret: &str) -> AuthResult<Principal> {
        validate_identifier(identifier)?;
        validate_secret(secret)?;

        let credential = self.hash_secret(secret).await?;
        let record = CredentialRecord::new(identifier, credential);
        let principal = Principal::from(&record);

        self.store.register(record).await?;

        log::info!("Registered principal '{}'", identifier);
        Ok(principal)
    }

    /// Authenticate a principal and issue an access token
    ///
    /// Unknown identifiers and wrong secrets fail the same way, with the same
    /// amount of hashing work.
    ///
    /// # Errors
    ///
    /// * `AuthError::InvalidCredentials` - Unknown identifier or wrong secret
    pub async fn login(&self, identifier: &str, secret: &str) -> AuthResult<String> {
        self.check_credentials(identifier, secret).await?;

        let token = self
            .tokens
            .issue(identifier, self.token_ttl)
            .map_err(AuthError::Token)?;

        log::debug!("Issued token for '{}'", identifier);
        Ok(token)
    }

    /// Verify an access token
    ///
    /// # Returns
    ///
    /// * `AuthResult<TokenClaims>` - Decoded claims or `AuthError::InvalidToken`
    pub fn verify_token(&self, token: &str) -> AuthResult<TokenClaims> {
        self.tokens.verify(token).map_err(|e| {
            log::debug!("Token rejected: {}", e);
            AuthError::InvalidToken
        })
    }

    /// Replace a principal's secret after re-authenticating with the current one
    ///
    /// # Errors
    ///
    /// * `AuthError::EmptySecret` / `AuthError::InvalidInput` - New secret rejected
    /// * `AuthError::InvalidCredentials` - Current secret wrong or principal unknown
    pub async fn change_secret(
        &self,
        identifier: &str,
        current_secret: &str,
        new_secret: &str,
    ) -> AuthResult<()> {
        validate_secret(new_secret)?;
        self.check_credentials(identifier, current_secret).await?;

        let credential = self.hash_secret(new_secret).await?;
        self.store
            .replace_credential(identifier, credential)
            .await
            .map_err(|e| match e {
                // Deregistered between the check and the swap
                StoreError::NotFound => AuthError::InvalidCredentials,
                other => AuthError::from(other),
            })?;

        log::info!("Changed secret for principal '{}'", identifier);
        Ok(())
    }

    /// Remove a principal after re-authenticating
    ///
    /// # Errors
    ///
    /// * `AuthError::InvalidCredentials` - Secret wrong or principal unknown
    pub async fn deregister(&self, identifier: &str, secret: &str) -> AuthResult<()> {
        self.check_credentials(identifier, secret).await?;

        if !self.store.remove(identifier).await? {
            return Err(AuthError::InvalidCredentials);
        }

        log::info!("Deregistered principal '{}'", identifier);
        Ok(())
    }

    /// Succeeds only for a registered identifier with a matching secret
    async fn check_credentials(&self, identifier: &str, secret: &str) -> AuthResult<()> {
        // Nothing that fails these checks can have been registered
        let well_formed = validate_identifier(identifier).is_ok()
            && !secret.is_empty()
            && secret.len() <= MAX_SECRET_LEN;

        if well_formed {
            let record = self.store.lookup(identifier).await?;
            let found = Choice::from(u8::from(record.is_some()));
            let credential = match record {
                Some(record) => record.credential().clone(),
                None => self.dummy_credential.clone(),
            };
            let verified = Choice::from(u8::from(self.verify_secret(secret, credential).await));

            if bool::from(found & verified) {
                return Ok(());
            }
        }

        log::warn!("Authentication failed for {:?}", identifier);
        Err(AuthError::InvalidCredentials)
    }

    /// Hash on the blocking pool; Argon2 is deliberately slow
    async fn hash_secret(&self, secret: &str) -> AuthResult<CredentialHash> {
        let hasher = Arc::clone(&self.hasher);
        let secret = secret.to_owned();

        tokio::task::spawn_blocking(move || hasher.hash(&secret))
            .await
            .map_err(|_| AuthError::HashingFailed)?
            .map_err(AuthError::from)
    }

    async fn verify_secret(&self, secret: &str, credential: CredentialHash) -> bool {
        let hasher = Arc::clone(&self.hasher);
        let secret = secret.to_owned();

        tokio::task::spawn_blocking(move || hasher.verify(&secret, &credential))
            .await
            .unwrap_or(false)
    }
}

impl std::fmt::Debug for AuthSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSystem")
            .field("tokens", &self.tokens)
            .field("token_ttl", &self.token_ttl)
            .finish_non_exhaustive()
    }
}

/// Validate identifier format
fn validate_identifier(identifier: &str) -> AuthResult<()> {
    if identifier.is_empty() {
        return Err(AuthError::InvalidInput(
            "Identifier must not be empty".to_string(),
        ));
    }

    if identifier.chars().count() > MAX_IDENTIFIER_LEN {
        return Err(AuthError::InvalidInput(format!(
            "Identifier must be at most {} characters",
            MAX_IDENTIFIER_LEN
        )));
    }

    if identifier
        .chars()
        .any(|c| c.is_whitespace() || c.is_control())
    {
        return Err(AuthError::InvalidInput(
            "Identifier must not contain whitespace or control characters".to_string(),
        ));
    }

    Ok(())
}

/// Validate secret bounds
fn validate_secret(secret: &str) -> AuthResult<()> {
    if secret.is_empty() {
        return Err(AuthError::EmptySecret);
    }

    if secret.len() > MAX_SECRET_LEN {
        return Err(AuthError::InvalidInput(format!(
            "Secret must be at most {} bytes",
            MAX_SECRET_LEN
        )));
    }

    Ok(())
}
