//! Profile handlers (protected)

use crate::auth::models::UserPublic;
use crate::auth::{AuthService, AuthenticatedUser, UpdateProfileRequest};
use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Extension, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

/// Profile response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub user: UserPublic,
}

/// Get the authenticated user's profile
///
/// # Responses
///
/// * `200 OK` - Public profile, never includes the password hash
/// * `401 Unauthorized` - No bearer token
/// * `403 Forbidden` - Invalid or expired token
/// * `404 Not Found` - Identity no longer exists
#[utoipa::path(
    get,
    path = "/profile",
    tag = "profile",
    responses(
        (status = 200, description = "Current user profile", body = ProfileResponse),
        (status = 401, description = "Missing token", body = crate::error::ApiError),
        (status = 403, description = "Invalid token", body = crate::error::ApiError),
        (status = 404, description = "User not found", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_profile_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, AppError> {
    let auth_service = AuthService::new(state.db.clone(), state.jwt_config.clone());
    let profile = auth_service.get_profile(user.user_id).await?;

    Ok(Json(ProfileResponse { user: profile }))
}

/// Update the authenticated user's display name
///
/// Records a PROFILE_UPDATE ledger entry.
///
/// # Responses
///
/// * `200 OK` - Updated profile
/// * `401 Unauthorized` - No bearer token
/// * `403 Forbidden` - Invalid or expired token
/// * `404 Not Found` - Identity no longer exists
/// * `500 Internal Server Error` - Storage failure
#[utoipa::path(
    put,
    path = "/profile",
    tag = "profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ProfileResponse),
        (status = 400, description = "Invalid input", body = crate::error::ApiError),
        (status = 401, description = "Missing token", body = crate::error::ApiError),
        (status = 403, description = "Invalid token", body = crate::error::ApiError),
        (status = 404, description = "User not found", body = crate::error::ApiError),
        (status = 500, description = "Internal server error", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_profile_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    let auth_service = AuthService::new(state.db.clone(), state.jwt_config.clone());
    let profile = auth_service.update_profile(user.user_id, request).await?;

    Ok(Json(ProfileResponse { user: profile }))
}
