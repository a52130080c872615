//! User model for blogd.

use chrono::{DateTime, Utc};

/// User entity representing a registered account.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    /// Unique user ID assigned by the database.
    pub id: i64,
    /// Opaque identifier embedded as the token subject.
    pub subject_id: String,
    /// Login email address (unique).
    pub email: String,
    /// Password hash (bcrypt).
    pub password_hash: String,
    /// Whether the user is the administrator.
    pub is_admin: bool,
    /// Account creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Data for creating a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Opaque token subject identifier.
    pub subject_id: String,
    /// Login email address.
    pub email: String,
    /// Password hash (must be pre-hashed).
    pub password_hash: String,
    /// Administrator flag (defaults to false).
    pub is_admin: bool,
}

impl NewUser {
    /// Create a new non-admin user.
    pub fn new(
        subject_id: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            subject_id: subject_id.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            is_admin: false,
        }
    }

    /// Set the administrator flag.
    pub fn with_admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }
}
