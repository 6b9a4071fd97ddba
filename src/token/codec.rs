//! HS256 token codec.

use super::{
    errors::{TokenError, TokenResult},
    models::TokenClaims,
};
use crate::config::{AuthConfig, MAX_TOKEN_LEN, SigningKey};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use std::fmt;

/// HMAC-SHA256 output length
const SIGNATURE_LEN: usize = 32;

/// Issues and verifies signed, expiring tokens under one shared key.
///
/// Stateless apart from the key material, so a single instance can be shared
/// across threads.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    max_future_issuance: Option<Duration>,
}

impl TokenCodec {
    /// Create a codec
    ///
    /// # Arguments
    ///
    /// * `key` - Shared signing key
    /// * `clock_skew_tolerance` - How far in the future `iat` may lie; `None`
    ///   accepts any issue time
    pub fn new(key: &SigningKey, clock_skew_tolerance: Option<Duration>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(key.as_bytes()),
            decoding_key: DecodingKey::from_secret(key.as_bytes()),
            validation,
            max_future_issuance: clock_skew_tolerance,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.signing_key, config.clock_skew_tolerance)
    }

    /// Issue a token for `subject` valid for `ttl` from now
    ///
    /// # Errors
    ///
    /// * `TokenError::EmptySubject` - Subject is empty
    pub fn issue(&self, subject: &str, ttl: Duration) -> TokenResult<String> {
        self.issue_at(subject, Utc::now(), ttl)
    }

    /// Issue a token with an explicit issue time
    pub fn issue_at(
        &self,
        subject: &str,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> TokenResult<String> {
        if subject.is_empty() {
            return Err(TokenError::EmptySubject);
        }

        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or(TokenError::InvalidLifetime)?;

        let claims = TokenClaims {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|_| TokenError::Signing)
    }

    /// Verify a token and return its claims
    ///
    /// Checks run in a fixed order: structure, then signature, then expiry,
    /// then issue time. Garbage never reaches the signature comparison, and
    /// an improperly signed token never reveals whether it has expired.
    ///
    /// # Errors
    ///
    /// * `TokenError::Malformed` - Not a well-formed HS256 token
    /// * `TokenError::BadSignature` - Signature does not match
    /// * `TokenError::Expired` - Expiry has passed
    /// * `TokenError::IssuedInFuture` - `iat` lies beyond the skew tolerance
    pub fn verify(&self, token: &str) -> TokenResult<TokenClaims> {
        parse_structure(token)?;

        let claims = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| classify(e.kind()))?
            .claims;

        if let Some(tolerance) = self.max_future_issuance {
            let latest = Utc::now().timestamp().saturating_add(tolerance.num_seconds());
            if claims.iat > latest {
                return Err(TokenError::IssuedInFuture);
            }
        }

        Ok(claims)
    }
}

/// Decode every segment without touching the key
///
/// Rejects anything that is not exactly `header.claims.signature` with an
/// HS256 header, a JSON claims object carrying a non-empty subject, and a
/// signature of the right length.
fn parse_structure(token: &str) -> TokenResult<()> {
    if token.is_empty() || token.len() > MAX_TOKEN_LEN {
        return Err(TokenError::Malformed);
    }

    let mut segments = token.split('.');
    let (Some(header), Some(claims), Some(signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(TokenError::Malformed);
    };

    let header: Header = decode_segment(header)?;
    if header.alg != Algorithm::HS256 {
        return Err(TokenError::Malformed);
    }

    let claims: TokenClaims = decode_segment(claims)?;
    if claims.sub.is_empty() {
        return Err(TokenError::Malformed);
    }

    let signature = URL_SAFE_NO_PAD
        .decode(signature)
        .map_err(|_| TokenError::Malformed)?;
    if signature.len() != SIGNATURE_LEN {
        return Err(TokenError::Malformed);
    }

    Ok(())
}

fn decode_segment<T: serde::de::DeserializeOwned>(segment: &str) -> TokenResult<T> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| TokenError::Malformed)?;
    serde_json::from_slice(&bytes).map_err(|_| TokenError::Malformed)
}

/// Map decoder failures onto the three verification outcomes
fn classify(kind: &ErrorKind) -> TokenError {
    match kind {
        ErrorKind::InvalidSignature => TokenError::BadSignature,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Malformed,
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &Algorithm::HS256)
            .field("max_future_issuance", &self.max_future_issuance)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &[u8] = b"token-codec-test-key-0123456789abcdef";
    const OTHER_KEY: &[u8] = b"a-completely-different-signing-key-xyz";

    fn codec() -> TokenCodec {
        TokenCodec::new(&SigningKey::new(KEY).unwrap(), None)
    }

    /// Swap the claims segment of a valid token, keeping header and signature
    fn with_claims_segment(token: &str, claims: &str) -> String {
        let parts: Vec<&str> = token.split('.').collect();
        format!("{}.{}.{}", parts[0], claims, parts[2])
    }

    #[test]
    fn test_issue_and_verify() {
        let codec = codec();
        let token = codec.issue("alice", Duration::hours(1)).unwrap();
        let claims = codec.verify(&token).unwrap();

        assert_eq!(claims.subject(), "alice");
        assert_eq!(claims.exp - claims.iat, 3600);
        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn test_issue_empty_subject() {
        assert_eq!(
            codec().issue("", Duration::hours(1)),
            Err(TokenError::EmptySubject)
        );
    }

    #[test]
    fn test_issue_lifetime_overflow() {
        let result = codec().issue_at("alice", DateTime::<Utc>::MAX_UTC, Duration::days(1));
        assert_eq!(result, Err(TokenError::InvalidLifetime));
    }

    #[test]
    fn test_token_does_not_contain_key() {
        let token = codec().issue("alice", Duration::hours(1)).unwrap();
        assert!(!token.contains(std::str::from_utf8(KEY).unwrap()));
    }

    #[test]
    fn test_expired_token() {
        let codec = codec();
        let issued = Utc::now() - Duration::hours(2);
        let token = codec.issue_at("alice", issued, Duration::hours(1)).unwrap();
        assert_eq!(codec.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_future_issued_token_accepted_without_tolerance() {
        let codec = codec();
        let issued = Utc::now() + Duration::days(1);
        let token = codec.issue_at("alice", issued, Duration::hours(1)).unwrap();
        assert!(codec.verify(&token).is_ok());
    }

    #[test]
    fn test_issue_time_within_tolerance_accepted() {
        let codec = TokenCodec::new(&SigningKey::new(KEY).unwrap(), Some(Duration::minutes(2)));
        let issued = Utc::now() + Duration::seconds(30);
        let token = codec.issue_at("alice", issued, Duration::hours(1)).unwrap();
        assert!(codec.verify(&token).is_ok());
    }

    #[test]
    fn test_issue_time_beyond_tolerance_rejected() {
        let codec = TokenCodec::new(&SigningKey::new(KEY).unwrap(), Some(Duration::minutes(2)));
        let issued = Utc::now() + Duration::minutes(10);
        let token = codec.issue_at("alice", issued, Duration::hours(1)).unwrap();
        assert_eq!(codec.verify(&token), Err(TokenError::IssuedInFuture));
    }

    #[test]
    fn test_tolerance_does_not_extend_expiry() {
        let codec = TokenCodec::new(&SigningKey::new(KEY).unwrap(), Some(Duration::minutes(2)));

        // Expired 30 seconds ago
        let issued = Utc::now() - Duration::hours(1) - Duration::seconds(30);
        let token = codec.issue_at("alice", issued, Duration::hours(1)).unwrap();
        assert_eq!(codec.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_wrong_key_is_bad_signature() {
        let token = codec().issue("alice", Duration::hours(1)).unwrap();
        let other = TokenCodec::new(&SigningKey::new(OTHER_KEY).unwrap(), None);
        assert_eq!(other.verify(&token), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_signature_checked_before_expiry() {
        let issued = Utc::now() - Duration::hours(2);
        let token = codec()
            .issue_at("alice", issued, Duration::hours(1))
            .unwrap();
        let other = TokenCodec::new(&SigningKey::new(OTHER_KEY).unwrap(), None);
        assert_eq!(other.verify(&token), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_malformed_tokens() {
        let codec = codec();
        for token in ["", "abc", "a.b", "a.b.c", "...", "not.a.token.at.all"] {
            assert_eq!(
                codec.verify(token),
                Err(TokenError::Malformed),
                "token {:?} should be malformed",
                token
            );
        }
    }

    #[test]
    fn test_truncated_token_is_rejected() {
        let codec = codec();
        let token = codec.issue("alice", Duration::hours(1)).unwrap();
        let (header_and_claims, _) = token.rsplit_once('.').unwrap();
        assert_eq!(codec.verify(header_and_claims), Err(TokenError::Malformed));
    }

    #[test]
    fn test_garbage_claims_segment_is_malformed() {
        let codec = codec();
        let token = codec.issue("alice", Duration::hours(1)).unwrap();
        let forged = with_claims_segment(&token, "!!!not-base64!!!");
        assert_eq!(codec.verify(&forged), Err(TokenError::Malformed));
    }

    #[test]
    fn test_truncated_claims_segment_is_malformed() {
        let codec = codec();
        let token = codec.issue("alice", Duration::hours(1)).unwrap();
        let claims = token.split('.').nth(1).unwrap();
        let forged = with_claims_segment(&token, &claims[..claims.len() - 5]);
        assert_eq!(codec.verify(&forged), Err(TokenError::Malformed));
    }

    #[test]
    fn test_non_json_claims_segment_is_malformed() {
        let codec = codec();
        let token = codec.issue("alice", Duration::hours(1)).unwrap();
        let forged = with_claims_segment(&token, &URL_SAFE_NO_PAD.encode("not json"));
        assert_eq!(codec.verify(&forged), Err(TokenError::Malformed));
    }

    #[test]
    fn test_claims_without_subject_are_malformed() {
        let codec = codec();
        let token = codec.issue("alice", Duration::hours(1)).unwrap();
        let claims = URL_SAFE_NO_PAD.encode(r#"{"iat":0,"exp":9999999999}"#);
        assert_eq!(
            codec.verify(&with_claims_segment(&token, &claims)),
            Err(TokenError::Malformed)
        );
    }

    #[test]
    fn test_reencoded_claims_are_bad_signature() {
        let codec = codec();
        let token = codec.issue("alice", Duration::hours(1)).unwrap();
        let claims = URL_SAFE_NO_PAD
            .encode(r#"{"sub":"mallory","iat":0,"exp":9999999999}"#);
        assert_eq!(
            codec.verify(&with_claims_segment(&token, &claims)),
            Err(TokenError::BadSignature)
        );
    }

    #[test]
    fn test_oversized_token_is_malformed() {
        let token = "a".repeat(MAX_TOKEN_LEN + 1);
        assert_eq!(codec().verify(&token), Err(TokenError::Malformed));
    }

    #[test]
    fn test_other_algorithm_rejected() {
        let claims = TokenClaims {
            sub: "alice".to_string(),
            iat: Utc::now().timestamp(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(KEY),
        )
        .unwrap();

        assert_eq!(codec().verify(&token), Err(TokenError::Malformed));
    }
}
