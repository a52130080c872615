//! User repository for blogd.
//!
//! This module provides the SQLite-backed user directory.

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use super::user::{NewUser, User};
use super::DbPool;
use crate::auth::{DirectoryError, UserDirectory};
use crate::error::is_unique_violation;
use crate::{BlogError, Result};

const USER_COLUMNS: &str = "id, subject_id, email, password_hash, is_admin, created_at";

/// Repository for user persistence.
///
/// Owns a clone of the pool so it can be shared as `Arc<dyn UserDirectory>`.
#[derive(Clone)]
pub struct UserRepository {
    pool: DbPool,
}

impl UserRepository {
    /// Create a new UserRepository over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a new user in the database.
    ///
    /// Returns the created user with the assigned ID, or
    /// `BlogError::Duplicate` when the email or subject id is taken.
    pub async fn create(&self, new_user: &NewUser) -> Result<User> {
        let result = sqlx::query(
            "INSERT INTO users (subject_id, email, password_hash, is_admin, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&new_user.subject_id)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(new_user.is_admin)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                BlogError::Duplicate("user".to_string())
            } else {
                BlogError::Database(e.to_string())
            }
        })?;

        let id = result.last_insert_rowid();
        debug!(user_id = id, "user created");
        self.get_by_id(id)
            .await?
            .ok_or_else(|| BlogError::NotFound("user".to_string()))
    }

    /// Get a user by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Get a user by email. The column collates NOCASE.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Get a user by token subject id.
    pub async fn get_by_subject_id(&self, subject_id: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE subject_id = ?");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(subject_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Check whether an administrator account exists.
    pub async fn admin_exists(&self) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE is_admin = 1)")
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    /// Set or clear the administrator flag of a user.
    ///
    /// Returns true if a user was updated.
    pub async fn set_admin(&self, subject_id: &str, is_admin: bool) -> Result<bool> {
        let result = sqlx::query("UPDATE users SET is_admin = ? WHERE subject_id = ?")
            .bind(is_admin)
            .bind(subject_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

}

fn backend(e: BlogError) -> DirectoryError {
    DirectoryError::Backend(e.to_string())
}

#[async_trait]
impl UserDirectory for UserRepository {
    async fn resolve_by_email(&self, email: &str) -> std::result::Result<User, DirectoryError> {
        self.get_by_email(email)
            .await
            .map_err(backend)?
            .ok_or(DirectoryError::NotFound)
    }

    async fn resolve_by_subject_id(
        &self,
        subject_id: &str,
    ) -> std::result::Result<User, DirectoryError> {
        self.get_by_subject_id(subject_id)
            .await
            .map_err(backend)?
            .ok_or(DirectoryError::NotFound)
    }

    async fn admin_exists(&self) -> std::result::Result<bool, DirectoryError> {
        UserRepository::admin_exists(self).await.map_err(backend)
    }

    async fn store(&self, user: NewUser) -> std::result::Result<User, DirectoryError> {
        self.create(&user).await.map_err(|e| match e {
            BlogError::Duplicate(_) => DirectoryError::Duplicate,
            other => backend(other),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    async fn setup() -> (Database, UserRepository) {
        let db = Database::open_in_memory().await.unwrap();
        let repo = UserRepository::new(db.pool().clone());
        (db, repo)
    }

    #[tokio::test]
    async fn test_create_user() {
        let (_db, repo) = setup().await;

        let user = repo
            .create(&NewUser::new("blogd|one", "one@example.com", "hash"))
            .await
            .unwrap();

        assert!(user.id > 0);
        assert_eq!(user.subject_id, "blogd|one");
        assert_eq!(user.email, "one@example.com");
        assert_eq!(user.password_hash, "hash");
        assert!(!user.is_admin);
    }

    #[tokio::test]
    async fn test_create_duplicate_email() {
        let (_db, repo) = setup().await;
        repo.create(&NewUser::new("blogd|one", "dup@example.com", "hash"))
            .await
            .unwrap();

        let result = repo
            .create(&NewUser::new("blogd|two", "dup@example.com", "hash"))
            .await;
        assert!(matches!(result, Err(BlogError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_create_duplicate_email_case_insensitive_lookup() {
        let (_db, repo) = setup().await;
        repo.create(&NewUser::new("blogd|one", "Mixed@Example.com", "hash"))
            .await
            .unwrap();

        let found = repo.get_by_email("mixed@example.com").await.unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn test_get_by_subject_id() {
        let (_db, repo) = setup().await;
        let created = repo
            .create(&NewUser::new("blogd|subj", "s@example.com", "hash"))
            .await
            .unwrap();

        let found = repo.get_by_subject_id("blogd|subj").await.unwrap().unwrap();
        assert_eq!(found, created);
        assert!(repo.get_by_subject_id("blogd|none").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_admin_exists() {
        let (_db, repo) = setup().await;
        assert!(!repo.admin_exists().await.unwrap());

        repo.create(&NewUser::new("blogd|user", "u@example.com", "hash"))
            .await
            .unwrap();
        assert!(!repo.admin_exists().await.unwrap());

        repo.create(&NewUser::new("blogd|admin", "a@example.com", "hash").with_admin(true))
            .await
            .unwrap();
        assert!(repo.admin_exists().await.unwrap());
    }

    #[tokio::test]
    async fn test_set_admin() {
        let (_db, repo) = setup().await;
        repo.create(&NewUser::new("blogd|admin", "a@example.com", "hash").with_admin(true))
            .await
            .unwrap();

        assert!(repo.set_admin("blogd|admin", false).await.unwrap());
        assert!(!repo.admin_exists().await.unwrap());
        assert!(!repo.set_admin("blogd|missing", true).await.unwrap());
    }

    #[tokio::test]
    async fn test_create_duplicate_email_differing_case() {
        let (_db, repo) = setup().await;
        repo.create(&NewUser::new("blogd|one", "Alice@example.com", "hash"))
            .await
            .unwrap();

        let result = repo
            .create(&NewUser::new("blogd|two", "alice@EXAMPLE.com", "hash"))
            .await;
        assert!(matches!(result, Err(BlogError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_directory_not_found() {
        let (_db, repo) = setup().await;

        let result = repo.resolve_by_email("nobody@example.com").await;
        assert!(matches!(result, Err(DirectoryError::NotFound)));

        let result = repo.resolve_by_subject_id("blogd|nobody").await;
        assert!(matches!(result, Err(DirectoryError::NotFound)));
    }

    #[tokio::test]
    async fn test_directory_store_duplicate() {
        let (_db, repo) = setup().await;
        repo.store(NewUser::new("blogd|one", "a@example.com", "hash"))
            .await
            .unwrap();

        let result = repo
            .store(NewUser::new("blogd|two", "a@example.com", "hash"))
            .await;
        assert!(matches!(result, Err(DirectoryError::Duplicate)));
    }

    #[tokio::test]
    async fn test_directory_backend_error_on_closed_pool() {
        let (db, repo) = setup().await;
        db.pool().close().await;

        let result = repo.resolve_by_subject_id("blogd|any").await;
        assert!(matches!(result, Err(DirectoryError::Backend(_))));
    }
}
