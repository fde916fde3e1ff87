//! Registration and login handlers

use crate::auth::{AuthResponse, AuthService, LoginRequest, RegisterRequest};
use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

/// Register a new user account
///
/// Creates an identity with the provided name, email, and password, issues a
/// session token, and records a REGISTRATION ledger entry.
///
/// # Responses
///
/// * `201 Created` - Token and public user info
/// * `400 Bad Request` - Invalid input or email already registered
/// * `500 Internal Server Error` - Storage failure
#[utoipa::path(
    post,
    path = "/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = AuthResponse),
        (status = 400, description = "Invalid input or duplicate email", body = crate::error::ApiError),
        (status = 500, description = "Internal server error", body = crate::error::ApiError),
    )
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let auth_service = AuthService::new(state.db.clone(), state.jwt_config.clone());
    let response = auth_service.register(request).await?;

    Ok((axum::http::StatusCode::CREATED, Json(response)))
}

/// Login with email and password
///
/// An unknown email and a wrong password produce the identical error
/// response.
///
/// # Responses
///
/// * `200 OK` - Token and public user info
/// * `400 Bad Request` - Invalid credentials
/// * `500 Internal Server Error` - Storage failure
#[utoipa::path(
    post,
    path = "/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Invalid credentials", body = crate::error::ApiError),
        (status = 500, description = "Internal server error", body = crate::error::ApiError),
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let auth_service = AuthService::new(state.db.clone(), state.jwt_config.clone());
    let response = auth_service.login(request).await?;

    Ok(Json(response))
}
