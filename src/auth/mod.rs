//! Authentication module providing registration, login and token verification.
//!
//! This module implements:
//! - Argon2id password hashing with optional server-side pepper
//! - HS256 access tokens with a configurable lifetime (default 1 hour)
//! - Uniform login failures: unknown identifiers and wrong secrets are
//!   indistinguishable in result and in hashing work
//! - Uniform token failures: malformed, forged and expired tokens all surface
//!   as `InvalidToken`
//!
//! ## Example
//!
//! ```no_run
//! use credential_auth::auth::{AuthError, AuthSystem};
//! use credential_auth::config::AuthConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let auth = AuthSystem::new(AuthConfig::from_env()?)?;
//!
//!     let principal = auth.register("player1", "SecurePass123").await?;
//!     println!("Registered: {}", principal.identifier);
//!
//!     match auth.login("player1", "wrong").await {
//!         Err(AuthError::InvalidCredentials) => println!("Rejected"),
//!         other => println!("Unexpected: {:?}", other),
//!     }
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod models;
pub mod system;

pub use errors::{AuthError, AuthResult};
pub use models::Principal;
pub use system::AuthSystem;
