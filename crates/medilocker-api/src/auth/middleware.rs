/// Session guard for protected routes
///
/// Extracts and validates the bearer token from the Authorization header.
/// A missing header fails with 401 before any identity is established; a
/// present-but-invalid token fails with 403. On success the decoded identity
/// reference is added to request extensions for downstream handlers.
///
/// This is a pure gate: it never touches the credential store and never
/// writes to the activity ledger.
use super::jwt::validate_token;
use crate::audit::{audit_log, AuditEvent};
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Authenticated identity reference extracted from a valid token
///
/// Added to request extensions by [`auth_middleware`]; handlers extract it
/// with `Extension<AuthenticatedUser>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
}

/// Authentication middleware that requires a valid bearer token
///
/// # Usage
///
/// ```ignore
/// use axum::{middleware, routing::get, Router};
/// use medilocker_api::auth::middleware::auth_middleware;
///
/// let protected = Router::new()
///     .route("/profile", get(profile_handler))
///     .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));
/// ```
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    // Extract Authorization header; absence means no identity was presented
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AppError::Unauthorized)?;

    // A presented token that fails verification is Forbidden, not Unauthorized
    let claims = match validate_token(&state.jwt_config, token) {
        Ok(claims) => claims,
        Err(e) => {
            audit_log(&AuditEvent::InvalidToken {
                reason: e.to_string(),
            });
            return Err(AppError::Forbidden);
        }
    };

    let user_id = match Uuid::parse_str(&claims.sub) {
        Ok(id) => id,
        Err(_) => {
            audit_log(&AuditEvent::InvalidToken {
                reason: "malformed subject claim".to_string(),
            });
            return Err(AppError::Forbidden);
        }
    };

    request.extensions_mut().insert(AuthenticatedUser {
        user_id,
        email: claims.email,
    });

    Ok(next.run(request).await)
}
