//! Authentication module for blogd.
//!
//! This module provides password hashing, session token issuing and
//! validation, user registration, and the user directory abstraction.

mod access;
mod claims;
mod directory;
mod error;
mod password;
mod registration;
mod token;

pub use access::AccessValidator;
pub use claims::{SessionClaims, SigningKey, UntrustedClaims, SESSION_LIFETIME_SECS};
pub use directory::{DirectoryError, InMemoryDirectory, UserDirectory};
pub use error::{AuthError, ClaimsViolation, Denial};
pub use password::{
    compare_blocking, hash_blocking, validate_password, BcryptHasher, CredentialHasher,
    HashError, PasswordError, MAX_PASSWORD_BYTES, MIN_PASSWORD_LENGTH,
};
pub use registration::{Registrar, Registration};
pub use token::{generate_subject_id, Credentials, TokenIssuer, SUBJECT_PREFIX};
