//! Password hashing and validation for blogd.
//!
//! Uses bcrypt with a configurable cost factor.

use std::sync::Arc;

use thiserror::Error;

use crate::config::{MAX_BCRYPT_COST, MIN_BCRYPT_COST};

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 10;

/// Maximum password length in bytes; bcrypt ignores anything beyond this.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Default bcrypt cost.
pub const DEFAULT_COST: u32 = 11;

/// Password hashing errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum HashError {
    /// Hashing failed (for example, cost out of range).
    #[error("password hashing failed: {0}")]
    Hash(String),

    /// Input is longer than bcrypt can process.
    #[error("password must be at most {MAX_PASSWORD_BYTES} bytes")]
    TooLong,

    /// Password does not match the hash.
    #[error("password verification failed")]
    Mismatch,

    /// Stored hash is not a bcrypt hash.
    #[error("invalid password hash format")]
    InvalidHash,
}

/// One-way password hashing.
pub trait CredentialHasher: Send + Sync {
    /// Hash a plaintext password.
    fn hash(&self, plaintext: &str) -> Result<String, HashError>;

    /// Check a plaintext password against a stored hash.
    ///
    /// The hash carries its own parameters, so a hash produced with any
    /// cost verifies regardless of the hasher's current cost.
    fn compare(&self, hash: &str, plaintext: &str) -> Result<(), HashError>;
}

/// bcrypt-backed [`CredentialHasher`].
#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    /// Create a hasher with the given cost.
    ///
    /// The cost is not checked here; an out-of-range cost makes `hash` fail.
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// The configured cost.
    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}

impl CredentialHasher for BcryptHasher {
    fn hash(&self, plaintext: &str) -> Result<String, HashError> {
        if plaintext.len() > MAX_PASSWORD_BYTES {
            return Err(HashError::TooLong);
        }
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&self.cost) {
            return Err(HashError::Hash(format!(
                "cost {} outside {MIN_BCRYPT_COST}..={MAX_BCRYPT_COST}",
                self.cost
            )));
        }
        bcrypt::hash(plaintext, self.cost).map_err(|e| HashError::Hash(e.to_string()))
    }

    fn compare(&self, hash: &str, plaintext: &str) -> Result<(), HashError> {
        match bcrypt::verify(plaintext, hash) {
            Ok(true) => Ok(()),
            Ok(false) => Err(HashError::Mismatch),
            Err(_) => Err(HashError::InvalidHash),
        }
    }
}

/// Hash on the blocking thread pool.
pub async fn hash_blocking(
    hasher: Arc<dyn CredentialHasher>,
    plaintext: String,
) -> Result<String, HashError> {
    tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
        .await
        .map_err(|e| HashError::Hash(e.to_string()))?
}

/// Compare on the blocking thread pool.
pub async fn compare_blocking(
    hasher: Arc<dyn CredentialHasher>,
    hash: String,
    plaintext: String,
) -> Result<(), HashError> {
    tokio::task::spawn_blocking(move || hasher.compare(&hash, &plaintext))
        .await
        .map_err(|e| HashError::Hash(e.to_string()))?
}

/// Password validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PasswordError {
    /// Password is too short.
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    TooShort,

    /// Password is too long.
    #[error("password must be at most {MAX_PASSWORD_BYTES} bytes")]
    TooLong,
}

/// Validate password requirements.
///
/// Checks:
/// - Minimum length: 10 characters
/// - Maximum length: 72 bytes
pub fn validate_password(password: &str) -> Result<(), PasswordError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(PasswordError::TooShort);
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(PasswordError::TooLong);
    }
    Ok(())
}
