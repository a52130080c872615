//! Session token issuing.

use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::claims::{SessionClaims, SigningKey};
use super::directory::{DirectoryError, UserDirectory};
use super::error::AuthError;
use super::password::{compare_blocking, hash_blocking, CredentialHasher, HashError};

/// Prefix of every generated subject id.
pub const SUBJECT_PREFIX: &str = "blogd|";

/// Plaintext of the hash compared against when the email is unknown.
const DECOY_PASSWORD: &str = "blogd decoy password";

/// Login credentials.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Generate a fresh opaque subject id.
///
/// The id is the nanosecond clock followed by 16 random bytes, base64url
/// encoded, so it is unguessable and does not collide in practice.
pub fn generate_subject_id() -> String {
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let mut raw = Vec::with_capacity(24);
    raw.extend_from_slice(&nanos.to_be_bytes());
    raw.extend_from_slice(uuid::Uuid::new_v4().as_bytes());
    format!("{SUBJECT_PREFIX}{}", URL_SAFE_NO_PAD.encode(raw))
}

/// Issues signed session tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    key: Arc<SigningKey>,
    directory: Arc<dyn UserDirectory>,
    hasher: Arc<dyn CredentialHasher>,
    decoy_hash: Arc<OnceCell<String>>,
}

impl TokenIssuer {
    pub fn new(
        key: Arc<SigningKey>,
        directory: Arc<dyn UserDirectory>,
        hasher: Arc<dyn CredentialHasher>,
    ) -> Self {
        Self {
            key,
            directory,
            hasher,
            decoy_hash: Arc::new(OnceCell::new()),
        }
    }

    /// Verify credentials and return a signed token for the stored subject.
    pub async fn login(&self, credentials: &Credentials) -> Result<String, AuthError> {
        self.login_at(credentials, Utc::now().timestamp()).await
    }

    /// [`login`](Self::login) with an explicit clock.
    ///
    /// An unknown email still pays for one bcrypt compare, so response time
    /// does not tell registered emails apart.
    pub async fn login_at(&self, credentials: &Credentials, now: i64) -> Result<String, AuthError> {
        let user = match self.directory.resolve_by_email(&credentials.email).await {
            Ok(user) => user,
            Err(DirectoryError::NotFound) => {
                self.compare_decoy(&credentials.password).await;
                return Err(AuthError::AuthenticationFailed(DirectoryError::NotFound));
            }
            Err(e) => return Err(AuthError::AuthenticationFailed(e)),
        };

        match compare_blocking(
            Arc::clone(&self.hasher),
            user.password_hash.clone(),
            credentials.password.clone(),
        )
        .await
        {
            Ok(()) => {}
            Err(HashError::Mismatch) => {
                debug!(user_id = user.id, "password mismatch");
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => return Err(AuthError::Hashing(e)),
        }

        let token = self.issue_at(&user.subject_id, now)?;
        info!(user_id = user.id, "user logged in");
        Ok(token)
    }

    /// Compare against a hash made once at the hasher's cost. The outcome is
    /// discarded.
    async fn compare_decoy(&self, password: &str) {
        let decoy = self
            .decoy_hash
            .get_or_try_init(|| hash_blocking(Arc::clone(&self.hasher), DECOY_PASSWORD.to_string()))
            .await;

        match decoy {
            Ok(hash) => {
                let _ = compare_blocking(
                    Arc::clone(&self.hasher),
                    hash.clone(),
                    password.to_string(),
                )
                .await;
            }
            Err(e) => debug!("decoy hash unavailable: {}", e),
        }
    }

    /// Sign a fresh token for a known subject.
    pub fn issue(&self, subject_id: &str) -> Result<String, AuthError> {
        self.issue_at(subject_id, Utc::now().timestamp())
    }

    /// [`issue`](Self::issue) with an explicit clock.
    pub fn issue_at(&self, subject_id: &str, now: i64) -> Result<String, AuthError> {
        self.key.sign(&SessionClaims::new(subject_id, now))
    }
}
