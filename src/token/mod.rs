//! Signed, expiring access tokens.
//!
//! Tokens are compact JWTs signed with HMAC-SHA256 under one shared key:
//! `base64url(header).base64url(claims).base64url(signature)`. Nothing is
//! stored server-side; a token ends when it expires or the key changes.

pub mod codec;
pub mod errors;
pub mod models;

pub use codec::TokenCodec;
pub use errors::{TokenError, TokenResult};
pub use models::TokenClaims;
