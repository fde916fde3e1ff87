//! Authentication service layer
//!
//! Business logic for registration, login, and profile management. Sits on
//! top of the credential store, the password hasher, the token authority,
//! and the activity ledger; handlers construct it from application state.

use super::jwt::{generate_token, JwtConfig};
use super::models::UserPublic;
use super::password::{hash_password, verify_password};
use super::repository::UserRepository;
use crate::activity::{ActivityAction, ActivityLedger};
use crate::audit::{audit_log, AuditEvent};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// User registration request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// User login request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Profile update request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
}

/// Authentication response with a session token
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserPublic,
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    ledger: ActivityLedger,
    jwt_config: JwtConfig,
}

impl AuthService {
    /// Create a new authentication service over the shared pool
    pub fn new(pool: PgPool, jwt_config: JwtConfig) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            ledger: ActivityLedger::new(pool),
            jwt_config,
        }
    }

    /// Register a new identity
    ///
    /// Validates input, hashes the password off the request path, inserts
    /// the identity (the unique index rejects duplicates atomically), issues
    /// a session token, and records a REGISTRATION ledger entry.
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AppError> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        // CPU-bound; keep it off the request-accepting path
        let password = request.password;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| AppError::Internal(format!("Hashing task failed: {e}")))?
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))?;

        let user = match self
            .users
            .create(&request.name, &request.email, &password_hash)
            .await
        {
            Ok(user) => user,
            Err(e) => {
                audit_log(&AuditEvent::RegistrationFailure {
                    email: request.email.clone(),
                    reason: e.to_string(),
                });
                return Err(e.into());
            }
        };

        let token = generate_token(&self.jwt_config, user.id, &user.email)
            .map_err(|e| AppError::Internal(format!("Failed to generate token: {e}")))?;

        self.record_activity(
            user.id,
            ActivityAction::Registration,
            format!("User {} registered successfully", user.name),
        )
        .await;

        audit_log(&AuditEvent::RegistrationSuccess {
            user_id: user.id,
            email: user.email.clone(),
        });

        Ok(AuthResponse {
            token,
            user: user.to_public(),
        })
    }

    /// Login with email and password
    ///
    /// An unknown email and a wrong password both fail with the same
    /// `InvalidCredentials` error so callers cannot probe which emails are
    /// registered.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AppError> {
        let user = match self.users.find_by_email(&request.email).await? {
            Some(user) => user,
            None => {
                audit_log(&AuditEvent::LoginFailure {
                    email: request.email.clone(),
                    reason: "unknown email".to_string(),
                });
                return Err(AppError::InvalidCredentials);
            }
        };

        let password = request.password;
        let stored_hash = user.password_hash.clone();
        let password_valid =
            tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
                .await
                .map_err(|e| AppError::Internal(format!("Verification task failed: {e}")))?
                .map_err(|e| AppError::Internal(format!("Failed to verify password: {e}")))?;

        if !password_valid {
            audit_log(&AuditEvent::LoginFailure {
                email: user.email.clone(),
                reason: "wrong password".to_string(),
            });
            return Err(AppError::InvalidCredentials);
        }

        let token = generate_token(&self.jwt_config, user.id, &user.email)
            .map_err(|e| AppError::Internal(format!("Failed to generate token: {e}")))?;

        self.record_activity(
            user.id,
            ActivityAction::Login,
            format!("User {} logged in", user.name),
        )
        .await;

        audit_log(&AuditEvent::LoginSuccess {
            user_id: user.id,
            email: user.email.clone(),
        });

        Ok(AuthResponse {
            token,
            user: user.to_public(),
        })
    }

    /// Get an identity's profile
    ///
    /// Fails with `NotFound` if the identity vanished between token issuance
    /// and use.
    pub async fn get_profile(&self, user_id: Uuid) -> Result<UserPublic, AppError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        Ok(user.to_public())
    }

    /// Update an identity's display name
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        request: UpdateProfileRequest,
    ) -> Result<UserPublic, AppError> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let user = self.users.update_name(user_id, &request.name).await?;

        self.record_activity(
            user.id,
            ActivityAction::ProfileUpdate,
            "User updated profile information".to_string(),
        )
        .await;

        audit_log(&AuditEvent::ProfileUpdate { user_id: user.id });

        Ok(user.to_public())
    }

    /// Record a ledger entry without masking the caller's success
    ///
    /// The registration/login is already committed when this runs; a ledger
    /// write failure is surfaced in the logs, not to the client.
    async fn record_activity(&self, user_id: Uuid, action: ActivityAction, details: String) {
        if let Err(e) = self.ledger.record(user_id, &action, &details).await {
            tracing::warn!(
                user_id = %user_id,
                action = %action,
                error = %e,
                "Failed to record activity"
            );
        }
    }
}
