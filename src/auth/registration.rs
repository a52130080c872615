//! User registration for blogd.

use std::sync::Arc;

use tracing::{info, warn};

use super::directory::{DirectoryError, UserDirectory};
use super::error::AuthError;
use super::password::{hash_blocking, CredentialHasher};
use super::token::{generate_subject_id, TokenIssuer};
use crate::db::{NewUser, User};

/// Registration request.
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub is_admin: bool,
}

impl Registration {
    /// Create a non-admin registration.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            is_admin: false,
        }
    }

    /// Request the administrator role.
    pub fn with_admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }
}

/// Creates accounts and logs them in.
#[derive(Clone)]
pub struct Registrar {
    directory: Arc<dyn UserDirectory>,
    hasher: Arc<dyn CredentialHasher>,
    issuer: TokenIssuer,
}

impl Registrar {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        hasher: Arc<dyn CredentialHasher>,
        issuer: TokenIssuer,
    ) -> Self {
        Self {
            directory,
            hasher,
            issuer,
        }
    }

    /// Register a new user and return it with a fresh session token.
    ///
    /// At most one administrator may exist; the check happens here, not in
    /// the schema.
    pub async fn register(&self, registration: Registration) -> Result<(User, String), AuthError> {
        if registration.is_admin
            && self
                .directory
                .admin_exists()
                .await
                .map_err(AuthError::Directory)?
        {
            warn!("rejected registration of a second admin");
            return Err(AuthError::AdminAlreadyExists);
        }

        let password_hash = hash_blocking(Arc::clone(&self.hasher), registration.password)
            .await
            .map_err(AuthError::Hashing)?;

        let new_user = NewUser::new(generate_subject_id(), registration.email, password_hash)
            .with_admin(registration.is_admin);
        let user = self.directory.store(new_user).await.map_err(|e| match e {
            DirectoryError::Duplicate => AuthError::DuplicateAccount,
            other => AuthError::Directory(other),
        })?;

        info!(user_id = user.id, is_admin = user.is_admin, "user registered");

        let token = self.issuer.issue(&user.subject_id)?;
        Ok((user, token))
    }
}
