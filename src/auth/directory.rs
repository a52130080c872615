//! User directory abstraction.
//!
//! The token core only talks to users through [`UserDirectory`]; production
//! uses [`crate::db::UserRepository`], tests can use [`InMemoryDirectory`].

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;

use crate::db::{NewUser, User};

/// Directory lookup and storage errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// No user matched the lookup.
    #[error("user not found")]
    NotFound,

    /// Email or subject id already taken.
    #[error("user already exists")]
    Duplicate,

    /// Storage failure.
    #[error("directory backend error: {0}")]
    Backend(String),
}

/// Lookup and persistence of users.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Resolve a user by login email.
    async fn resolve_by_email(&self, email: &str) -> Result<User, DirectoryError>;

    /// Resolve a user by token subject id.
    async fn resolve_by_subject_id(&self, subject_id: &str) -> Result<User, DirectoryError>;

    /// Whether an administrator account exists.
    async fn admin_exists(&self) -> Result<bool, DirectoryError>;

    /// Persist a new user.
    async fn store(&self, user: NewUser) -> Result<User, DirectoryError>;
}

/// In-memory directory for tests and tooling.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    users: RwLock<Vec<User>>,
    fail: RwLock<Option<String>>,
    last_id: AtomicI64,
}

impl InMemoryDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the admin flag of a user. Returns false if the subject is unknown.
    pub fn set_admin(&self, subject_id: &str, is_admin: bool) -> bool {
        let mut users = self.users.write().unwrap_or_else(|e| e.into_inner());
        match users.iter_mut().find(|u| u.subject_id == subject_id) {
            Some(user) => {
                user.is_admin = is_admin;
                true
            }
            None => false,
        }
    }

    /// Remove a user. Returns false if the subject is unknown.
    pub fn remove(&self, subject_id: &str) -> bool {
        let mut users = self.users.write().unwrap_or_else(|e| e.into_inner());
        let before = users.len();
        users.retain(|u| u.subject_id != subject_id);
        users.len() != before
    }

    /// Make every subsequent call fail with a backend error.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.fail.write().unwrap_or_else(|e| e.into_inner()) = Some(message.into());
    }

    fn check_backend(&self) -> Result<(), DirectoryError> {
        match self.fail.read().unwrap_or_else(|e| e.into_inner()).as_ref() {
            Some(msg) => Err(DirectoryError::Backend(msg.clone())),
            None => Ok(()),
        }
    }

    fn find(&self, pred: impl Fn(&User) -> bool) -> Result<User, DirectoryError> {
        self.check_backend()?;
        self.users
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .find(|u| pred(u))
            .cloned()
            .ok_or(DirectoryError::NotFound)
    }
}

#[async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn resolve_by_email(&self, email: &str) -> Result<User, DirectoryError> {
        self.find(|u| u.email.eq_ignore_ascii_case(email))
    }

    async fn resolve_by_subject_id(&self, subject_id: &str) -> Result<User, DirectoryError> {
        self.find(|u| u.subject_id == subject_id)
    }

    async fn admin_exists(&self) -> Result<bool, DirectoryError> {
        self.check_backend()?;
        Ok(self
            .users
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .any(|u| u.is_admin))
    }

    async fn store(&self, user: NewUser) -> Result<User, DirectoryError> {
        self.check_backend()?;
        let mut users = self.users.write().unwrap_or_else(|e| e.into_inner());
        if users.iter().any(|u| {
            u.email.eq_ignore_ascii_case(&user.email) || u.subject_id == user.subject_id
        }) {
            return Err(DirectoryError::Duplicate);
        }

        let stored = User {
            id: self.last_id.fetch_add(1, Ordering::SeqCst) + 1,
            subject_id: user.subject_id,
            email: user.email,
            password_hash: user.password_hash,
            is_admin: user.is_admin,
            created_at: Utc::now(),
        };
        users.push(stored.clone());
        Ok(stored)
    }
}
