//! Bearer token validation for protected requests.
//!
//! Every call decodes the token and then resolves its subject against the
//! directory again, so revoking admin rights takes effect on the next
//! request. Nothing is cached between calls.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;

use super::claims::SigningKey;
use super::directory::UserDirectory;
use super::error::{AuthError, ClaimsViolation, Denial};

/// Decides whether a bearer token grants admin access.
#[derive(Clone)]
pub struct AccessValidator {
    key: Arc<SigningKey>,
    directory: Arc<dyn UserDirectory>,
}

impl AccessValidator {
    pub fn new(key: Arc<SigningKey>, directory: Arc<dyn UserDirectory>) -> Self {
        Self { key, directory }
    }

    /// Validate a token against the wall clock.
    ///
    /// Returns the subject id on success.
    pub async fn validate(&self, token: &str) -> Result<String, AuthError> {
        self.validate_at(token, Utc::now().timestamp()).await
    }

    /// Validate a token at Unix time `now`.
    ///
    /// Checks run in order and stop at the first failure: signature,
    /// expiry and issue time, subject shape, then the directory lookup.
    pub async fn validate_at(&self, token: &str, now: i64) -> Result<String, AuthError> {
        let claims = self.key.verify(token)?;

        let exp = claims
            .exp
            .ok_or(AuthError::InvalidClaims(ClaimsViolation::MissingExpiry))?;
        let iat = claims
            .iat
            .ok_or(AuthError::InvalidClaims(ClaimsViolation::MissingIssueTime))?;
        if now >= exp {
            return Err(AuthError::InvalidClaims(ClaimsViolation::Expired));
        }
        if iat > now {
            return Err(AuthError::InvalidClaims(ClaimsViolation::NotYetValid));
        }

        let subject = match claims.sub {
            None | Some(Value::Null) => {
                return Err(AuthError::InvalidClaims(ClaimsViolation::MissingSubject))
            }
            Some(Value::String(s)) => s,
            Some(_) => {
                return Err(AuthError::InvalidClaims(
                    ClaimsViolation::InvalidSubjectFormat,
                ))
            }
        };

        let user = self
            .directory
            .resolve_by_subject_id(&subject)
            .await
            .map_err(|e| AuthError::AccessDenied(Denial::Lookup(e)))?;
        if !user.is_admin {
            return Err(AuthError::AccessDenied(Denial::InsufficientPrivilege));
        }

        Ok(subject)
    }
}
