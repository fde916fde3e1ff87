//! Credential store over PostgreSQL
//!
//! Persists identities and enforces email uniqueness. Duplicate detection
//! relies on the `users_email_key` unique index: creation is a single
//! constrained INSERT, so two concurrent registrations of the same email
//! cannot race past each other.

use super::models::User;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

/// Repository errors
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("User not found")]
    UserNotFound,

    #[error("Email already exists")]
    EmailAlreadyExists,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Normalize an email address for storage and lookup
///
/// Applied on both write and read paths so comparisons are always against
/// the same form.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

/// Identity repository over PostgreSQL
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new identity
    ///
    /// # Returns
    ///
    /// * `Ok(User)` - created identity with server-assigned id
    /// * `Err(RepositoryError::EmailAlreadyExists)` - the unique index
    ///   rejected the insert
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let user = User::new(
            name.to_string(),
            normalize_email(email),
            password_hash.to_string(),
        );

        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    return RepositoryError::EmailAlreadyExists;
                }
            }
            RepositoryError::Database(e)
        })
    }

    /// Find an identity by email (exact match on the normalized form)
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, created_at, updated_at FROM users WHERE email = $1",
        )
        .bind(normalize_email(email))
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find an identity by id
    pub async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, created_at, updated_at FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Update an identity's display name
    ///
    /// # Returns
    ///
    /// * `Ok(User)` - updated identity
    /// * `Err(RepositoryError::UserNotFound)` - no row with that id
    pub async fn update_name(&self, user_id: Uuid, name: &str) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET name = $2, updated_at = $3
            WHERE id = $1
            RETURNING id, name, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(chrono::Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        user.ok_or(RepositoryError::UserNotFound)
    }
}
