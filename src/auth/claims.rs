//! Session token claims and the shared signing key.

use std::collections::HashSet;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Deserializer, Serialize};

use super::error::AuthError;

/// Lifetime of a session token (24 hours).
pub const SESSION_LIFETIME_SECS: i64 = 24 * 60 * 60;

/// Claims of an issued session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (the user's subject id).
    pub sub: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl SessionClaims {
    /// Claims for `subject` issued at `now`.
    pub fn new(subject: impl Into<String>, now: i64) -> Self {
        Self {
            sub: subject.into(),
            iat: now,
            exp: now + SESSION_LIFETIME_SECS,
        }
    }
}

/// Claims as read from an untrusted token, before the temporal and
/// subject checks.
#[derive(Debug, Clone, Deserialize)]
pub struct UntrustedClaims {
    #[serde(default)]
    pub sub: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "numeric_date")]
    pub iat: Option<i64>,
    #[serde(default, deserialize_with = "numeric_date")]
    pub exp: Option<i64>,
}

/// Read a NumericDate, integer or fractional, as whole seconds.
fn numeric_date<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(number) = Option::<serde_json::Number>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if let Some(secs) = number.as_i64() {
        return Ok(Some(secs));
    }
    match number.as_f64() {
        Some(secs) if secs.is_finite() && secs.abs() < i64::MAX as f64 => {
            Ok(Some(secs.trunc() as i64))
        }
        _ => Err(serde::de::Error::custom("NumericDate out of range")),
    }
}

/// HS256 key material shared by the issuer and the validator.
///
/// Only the signature and the algorithm are checked here. Expiry, issue time
/// and subject are left to the caller so the checks run against an explicit
/// clock and in a fixed order.
pub struct SigningKey {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl SigningKey {
    /// Create a key from a shared secret.
    pub fn from_secret(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims = HashSet::new();

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Sign claims into a compact token.
    pub fn sign<T: Serialize>(&self, claims: &T) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Verify structure, algorithm and signature; return the raw claims.
    pub fn verify(&self, token: &str) -> Result<UntrustedClaims, AuthError> {
        decode::<UntrustedClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("token verification failed: {}", e);
                AuthError::InvalidToken(match e.kind() {
                    ErrorKind::InvalidSignature => "bad signature",
                    ErrorKind::InvalidAlgorithm | ErrorKind::MissingAlgorithm => {
                        "unsupported algorithm"
                    }
                    _ => "malformed token",
                })
            })
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey").finish_non_exhaustive()
    }
}
