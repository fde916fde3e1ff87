//! Identity models for the authentication system
//!
//! `User` maps to the `users` table. The password hash lives only on the
//! internal model and is never serialized; API responses use `UserPublic`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// User account model
///
/// Represents a registered identity with its credentials and profile
/// information. Identities are created on registration and never deleted;
/// only the display name is mutable.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique identifier, generated by the server at registration
    pub id: Uuid,

    /// User's display name
    pub name: String,

    /// User's email address (stored normalized, unique)
    pub email: String,

    /// Argon2id password hash (PHC string)
    /// This field is never serialized in API responses
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Account creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with the given credentials
    ///
    /// The email must already be normalized (see
    /// [`crate::auth::repository::normalize_email`]) and the password hashed.
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    /// Convert user to public representation (without the password hash)
    pub fn to_public(&self) -> UserPublic {
        UserPublic {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            created_at: self.created_at,
        }
    }
}

/// Public user representation (safe for API responses)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserPublic {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}
