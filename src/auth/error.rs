//! Auth errors

use thiserror::Error;

use super::directory::DirectoryError;
use super::password::HashError;

/// Why a token's claims were rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimsViolation {
    #[error("missing expiry")]
    MissingExpiry,

    #[error("missing issue time")]
    MissingIssueTime,

    #[error("expired")]
    Expired,

    #[error("not yet valid")]
    NotYetValid,

    #[error("missing subject")]
    MissingSubject,

    #[error("invalid subject format")]
    InvalidSubjectFormat,
}

/// Why an otherwise valid token was refused.
///
/// Both variants look the same to clients.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    /// Subject could not be resolved.
    #[error("subject lookup failed: {0}")]
    Lookup(DirectoryError),

    /// Subject resolved but is not an administrator.
    #[error("insufficient privilege")]
    InsufficientPrivilege,
}

/// Authentication and authorization errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// No Authorization header, or an empty one
    #[error("missing credentials")]
    MissingCredentials,

    /// Authorization header is not `Bearer <token>`
    #[error("malformed credentials")]
    MalformedCredentials,

    /// Token failed to parse or verify
    #[error("invalid token: {0}")]
    InvalidToken(&'static str),

    /// Token claims failed the temporal or shape checks
    #[error("invalid claims: {0}")]
    InvalidClaims(ClaimsViolation),

    /// Token was valid but access was refused
    #[error("access denied: {0}")]
    AccessDenied(Denial),

    /// Login email could not be resolved
    #[error("authentication failed: {0}")]
    AuthenticationFailed(DirectoryError),

    /// Login password did not match
    #[error("invalid credentials")]
    InvalidCredentials,

    /// A second administrator registration was attempted
    #[error("admin account has already been created")]
    AdminAlreadyExists,

    /// Registration email already in use
    #[error("account already exists")]
    DuplicateAccount,

    /// Password hashing failed
    #[error("hashing error: {0}")]
    Hashing(HashError),

    /// Token signing failed
    #[error("signing error: {0}")]
    Signing(String),

    /// Directory failure outside of login and validation
    #[error("directory error: {0}")]
    Directory(DirectoryError),
}

impl AuthError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingCredentials
            | Self::MalformedCredentials
            | Self::InvalidToken(_)
            | Self::InvalidClaims(_)
            | Self::AccessDenied(_)
            | Self::InvalidCredentials => 401,
            Self::AuthenticationFailed(DirectoryError::Backend(_)) => 500,
            Self::AuthenticationFailed(_) => 401,
            Self::AdminAlreadyExists => 403,
            Self::DuplicateAccount => 409,
            Self::Hashing(_) | Self::Signing(_) | Self::Directory(_) => 500,
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self.status_code() {
            401 => "UNAUTHORIZED",
            403 => "FORBIDDEN",
            409 => "CONFLICT",
            _ => "INTERNAL_ERROR",
        }
    }

    /// Message safe to show to clients.
    ///
    /// Denials and login failures never reveal which check failed.
    pub fn public_message(&self) -> String {
        match self {
            Self::MissingCredentials => "missing authorization header".to_string(),
            Self::MalformedCredentials => "malformed authorization header".to_string(),
            Self::InvalidToken(_) | Self::InvalidClaims(_) => self.to_string(),
            Self::AccessDenied(_) => "access denied".to_string(),
            Self::AuthenticationFailed(DirectoryError::Backend(_)) => {
                "internal server error".to_string()
            }
            Self::AuthenticationFailed(_) | Self::InvalidCredentials => {
                "invalid email or password".to_string()
            }
            Self::AdminAlreadyExists | Self::DuplicateAccount => self.to_string(),
            Self::Hashing(_) | Self::Signing(_) | Self::Directory(_) => {
                "internal server error".to_string()
            }
        }
    }
}
