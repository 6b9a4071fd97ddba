//! Authentication configuration.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use chrono::Duration;
use std::{fmt, str::FromStr, sync::Arc};

/// Signing key environment variable (required)
pub const SIGNING_SECRET_VAR: &str = "AUTH_SIGNING_SECRET";
/// Password pepper environment variable (optional)
pub const PASSWORD_PEPPER_VAR: &str = "AUTH_PASSWORD_PEPPER";
pub const TOKEN_TTL_VAR: &str = "AUTH_TOKEN_TTL_SECS";
pub const CLOCK_SKEW_VAR: &str = "AUTH_CLOCK_SKEW_SECS";
pub const HASH_MEMORY_VAR: &str = "AUTH_HASH_MEMORY_KIB";
pub const HASH_ITERATIONS_VAR: &str = "AUTH_HASH_ITERATIONS";
pub const HASH_PARALLELISM_VAR: &str = "AUTH_HASH_PARALLELISM";

/// Minimum signing key length in bytes (256 bits)
pub const MIN_SIGNING_KEY_LEN: usize = 32;
/// Minimum pepper length in bytes
pub const MIN_PEPPER_LEN: usize = 16;
/// Maximum identifier length in characters
pub const MAX_IDENTIFIER_LEN: usize = 64;
/// Maximum secret length in bytes
pub const MAX_SECRET_LEN: usize = 1024;
/// Maximum encoded token length in bytes
pub const MAX_TOKEN_LEN: usize = 4096;

/// Default token lifetime in seconds
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;

/// Shared secret used to sign and verify tokens.
///
/// Read-only after construction. `Debug` prints the length only.
#[derive(Clone)]
pub struct SigningKey {
    bytes: Arc<[u8]>,
}

impl SigningKey {
    /// Create a signing key from raw bytes
    ///
    /// # Errors
    ///
    /// * `ConfigError::Invalid` - Key shorter than 32 bytes
    pub fn new(key: impl AsRef<[u8]>) -> Result<Self, ConfigError> {
        let bytes = key.as_ref();
        if bytes.len() < MIN_SIGNING_KEY_LEN {
            return Err(ConfigError::Invalid {
                var: SIGNING_SECRET_VAR.to_string(),
                reason: format!(
                    "Must be at least {} bytes (256-bit security)",
                    MIN_SIGNING_KEY_LEN
                ),
            });
        }

        Ok(Self {
            bytes: Arc::from(bytes),
        })
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("key_length", &self.bytes.len())
            .finish_non_exhaustive()
    }
}

/// Argon2 work factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    /// Memory cost in KiB
    pub memory_kib: u32,

    /// Number of passes; higher is slower and harder to brute force
    pub iterations: u32,

    /// Degree of parallelism (lanes)
    pub parallelism: u32,
}

impl HashCost {
    /// Argon2's recommended defaults for interactive logins
    pub fn interactive() -> Self {
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }

    /// Smallest cost Argon2 accepts. Only suitable for tests and benchmarks.
    pub fn minimal() -> Self {
        Self {
            memory_kib: argon2::Params::MIN_M_COST,
            iterations: argon2::Params::MIN_T_COST,
            parallelism: argon2::Params::MIN_P_COST,
        }
    }

    pub(crate) fn params(&self) -> Result<argon2::Params, argon2::Error> {
        argon2::Params::new(self.memory_kib, self.iterations, self.parallelism, None)
    }
}

impl Default for HashCost {
    fn default() -> Self {
        Self::interactive()
    }
}

/// Complete authentication configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// Token signing key
    pub signing_key: SigningKey,

    /// Lifetime of issued tokens
    pub token_ttl: Duration,

    /// How far in the future a token's issue time may lie; `None` accepts any
    pub clock_skew_tolerance: Option<Duration>,

    /// Argon2 work factors for new hashes
    pub hash_cost: HashCost,

    /// Optional server-side pepper fed to Argon2 as its secret
    pub password_pepper: Option<Arc<[u8]>>,
}

impl AuthConfig {
    /// Create a configuration with default TTL, no issue-time check and interactive hash cost
    pub fn new(signing_key: SigningKey) -> Self {
        Self {
            signing_key,
            token_ttl: Duration::seconds(DEFAULT_TOKEN_TTL_SECS),
            clock_skew_tolerance: None,
            hash_cost: HashCost::default(),
            password_pepper: None,
        }
    }

    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    pub fn with_clock_skew_tolerance(mut self, tolerance: Duration) -> Self {
        self.clock_skew_tolerance = Some(tolerance);
        self
    }

    pub fn with_hash_cost(mut self, cost: HashCost) -> Self {
        self.hash_cost = cost;
        self
    }

    pub fn with_pepper(mut self, pepper: impl AsRef<[u8]>) -> Self {
        self.password_pepper = Some(Arc::from(pepper.as_ref()));
        self
    }

    /// Load configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `AUTH_SIGNING_SECRET`: token signing key, at least 32 bytes (required)
    /// - `AUTH_PASSWORD_PEPPER`: Argon2 secret, at least 16 bytes (optional)
    /// - `AUTH_TOKEN_TTL_SECS`: token lifetime (default: 3600)
    /// - `AUTH_CLOCK_SKEW_SECS`: how far ahead a token's issue time may lie
    ///   (default: unchecked)
    /// - `AUTH_HASH_MEMORY_KIB`: Argon2 memory cost (default: 19456)
    /// - `AUTH_HASH_ITERATIONS`: Argon2 time cost (default: 2)
    /// - `AUTH_HASH_PARALLELISM`: Argon2 lanes (default: 1)
    ///
    /// # Errors
    ///
    /// Returns error if required variables are missing or values are invalid
    /// or unparsable
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = var(SIGNING_SECRET_VAR).ok_or_else(|| ConfigError::MissingRequired {
            var: SIGNING_SECRET_VAR.to_string(),
            hint: "Generate with: openssl rand -hex 32".to_string(),
        })?;
        let signing_key = SigningKey::new(secret)?;

        let token_ttl_secs = parse_var_or(&var, TOKEN_TTL_VAR, DEFAULT_TOKEN_TTL_SECS)?;
        let token_ttl = Duration::try_seconds(token_ttl_secs).ok_or_else(|| {
            ConfigError::Invalid {
                var: TOKEN_TTL_VAR.to_string(),
                reason: "Out of range".to_string(),
            }
        })?;

        let clock_skew_tolerance = match parse_var::<_, i64>(&var, CLOCK_SKEW_VAR)? {
            Some(secs) => Some(Duration::try_seconds(secs).ok_or_else(|| {
                ConfigError::Invalid {
                    var: CLOCK_SKEW_VAR.to_string(),
                    reason: "Out of range".to_string(),
                }
            })?),
            None => None,
        };

        let defaults = HashCost::default();
        let hash_cost = HashCost {
            memory_kib: parse_var_or(&var, HASH_MEMORY_VAR, defaults.memory_kib)?,
            iterations: parse_var_or(&var, HASH_ITERATIONS_VAR, defaults.iterations)?,
            parallelism: parse_var_or(&var, HASH_PARALLELISM_VAR, defaults.parallelism)?,
        };

        let config = Self {
            signing_key,
            token_ttl,
            clock_skew_tolerance,
            hash_cost,
            password_pepper: var(PASSWORD_PEPPER_VAR).map(|p| Arc::from(p.into_bytes())),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration after loading
    ///
    /// # Returns
    ///
    /// * `Result<(), ConfigError>` - Success or validation error
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token_ttl <= Duration::zero() {
            return Err(ConfigError::Invalid {
                var: TOKEN_TTL_VAR.to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        let negative_skew = self
            .clock_skew_tolerance
            .is_some_and(|tolerance| tolerance < Duration::zero());
        if negative_skew {
            return Err(ConfigError::Invalid {
                var: CLOCK_SKEW_VAR.to_string(),
                reason: "Must not be negative".to_string(),
            });
        }

        if let Err(e) = self.hash_cost.params() {
            let var = match e {
                argon2::Error::MemoryTooLittle | argon2::Error::MemoryTooMuch => HASH_MEMORY_VAR,
                argon2::Error::TimeTooSmall => HASH_ITERATIONS_VAR,
                argon2::Error::ThreadsTooFew | argon2::Error::ThreadsTooMany => {
                    HASH_PARALLELISM_VAR
                }
                _ => "AUTH_HASH_COST",
            };
            return Err(ConfigError::Invalid {
                var: var.to_string(),
                reason: e.to_string(),
            });
        }

        let short_pepper = self
            .password_pepper
            .as_ref()
            .is_some_and(|pepper| pepper.len() < MIN_PEPPER_LEN);
        if short_pepper {
            return Err(ConfigError::Invalid {
                var: PASSWORD_PEPPER_VAR.to_string(),
                reason: format!(
                    "Must be at least {} characters (64-bit security)",
                    MIN_PEPPER_LEN
                ),
            });
        }

        Ok(())
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("signing_key", &self.signing_key)
            .field("token_ttl", &self.token_ttl)
            .field("clock_skew_tolerance", &self.clock_skew_tolerance)
            .field("hash_cost", &self.hash_cost)
            .field("password_pepper", &self.password_pepper.is_some())
            .finish()
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Parse a variable if it is set
fn parse_var<F, T>(var: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    var(key)
        .map(|v| {
            v.trim().parse().map_err(|_| ConfigError::Invalid {
                var: key.to_string(),
                reason: format!("Must be a valid number, got {:?}", v),
            })
        })
        .transpose()
}

/// Parse a variable, falling back to `default` only when it is unset
fn parse_var_or<F, T>(var: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    Ok(parse_var(var, key)?.unwrap_or(default))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const KEY: &str = "0123456789abcdef0123456789abcdef";

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_signing_key_too_short() {
        let result = SigningKey::new("short");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_signing_key_debug_is_redacted() {
        let key = SigningKey::new(KEY).unwrap();
        let debug = format!("{:?}", key);
        assert!(!debug.contains(KEY));
        assert!(debug.contains("key_length"));
    }

    #[test]
    fn test_from_vars_requires_signing_secret() {
        let result = AuthConfig::from_vars(lookup(&[]));
        match result {
            Err(ConfigError::MissingRequired { var, .. }) => assert_eq!(var, SIGNING_SECRET_VAR),
            other => panic!("Expected MissingRequired, got {:?}", other),
        }
    }

    #[test]
    fn test_from_vars_defaults() {
        let config = AuthConfig::from_vars(lookup(&[(SIGNING_SECRET_VAR, KEY)])).unwrap();
        assert_eq!(config.token_ttl, Duration::seconds(3600));
        assert_eq!(config.clock_skew_tolerance, None);
        assert_eq!(config.hash_cost, HashCost::interactive());
        assert!(config.password_pepper.is_none());
    }

    #[test]
    fn test_from_vars_overrides() {
        let config = AuthConfig::from_vars(lookup(&[
            (SIGNING_SECRET_VAR, KEY),
            (TOKEN_TTL_VAR, "900"),
            (CLOCK_SKEW_VAR, "30"),
            (HASH_ITERATIONS_VAR, "3"),
            (PASSWORD_PEPPER_VAR, "pepper-of-sixteen-bytes"),
        ]))
        .unwrap();

        assert_eq!(config.token_ttl, Duration::seconds(900));
        assert_eq!(config.clock_skew_tolerance, Some(Duration::seconds(30)));
        assert_eq!(config.hash_cost.iterations, 3);
        assert!(config.password_pepper.is_some());
    }

    #[test]
    fn test_unparsable_value_rejected() {
        for (key, value) in [
            (TOKEN_TTL_VAR, "soon"),
            (HASH_ITERATIONS_VAR, "abc"),
            (HASH_MEMORY_VAR, "-1"),
            (CLOCK_SKEW_VAR, "30s"),
        ] {
            let result = AuthConfig::from_vars(lookup(&[(SIGNING_SECRET_VAR, KEY), (key, value)]));
            match result {
                Err(ConfigError::Invalid { var, .. }) => assert_eq!(var, key),
                other => panic!("Expected Invalid for {}, got {:?}", key, other),
            }
        }
    }

    #[test]
    fn test_zero_skew_is_distinct_from_unset() {
        let config =
            AuthConfig::from_vars(lookup(&[(SIGNING_SECRET_VAR, KEY), (CLOCK_SKEW_VAR, "0")]))
                .unwrap();
        assert_eq!(config.clock_skew_tolerance, Some(Duration::zero()));
    }

    #[test]
    fn test_validate_rejects_zero_ttl() {
        let result = AuthConfig::from_vars(lookup(&[(SIGNING_SECRET_VAR, KEY), (TOKEN_TTL_VAR, "0")]));
        match result {
            Err(ConfigError::Invalid { var, .. }) => assert_eq!(var, TOKEN_TTL_VAR),
            other => panic!("Expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_negative_skew() {
        let config = AuthConfig::new(SigningKey::new(KEY).unwrap())
            .with_clock_skew_tolerance(Duration::seconds(-5));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_iterations() {
        let config = AuthConfig::new(SigningKey::new(KEY).unwrap()).with_hash_cost(HashCost {
            iterations: 0,
            ..HashCost::minimal()
        });
        match config.validate() {
            Err(ConfigError::Invalid { var, .. }) => assert_eq!(var, HASH_ITERATIONS_VAR),
            other => panic!("Expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_short_pepper() {
        let config = AuthConfig::new(SigningKey::new(KEY).unwrap()).with_pepper("short");
        match config.validate() {
            Err(ConfigError::Invalid { var, .. }) => assert_eq!(var, PASSWORD_PEPPER_VAR),
            other => panic!("Expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn test_config_debug_hides_pepper() {
        let config =
            AuthConfig::new(SigningKey::new(KEY).unwrap()).with_pepper("pepper-of-sixteen-bytes");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("pepper-of-sixteen-bytes"));
        assert!(!debug.contains(KEY));
    }
}
