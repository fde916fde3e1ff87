//! Activity ledger handlers (protected)

use crate::activity::{ActivityAction, ActivityLedger, ActivityRecord, DEFAULT_PAGE_SIZE};
use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Extension, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

/// Activity listing response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ActivityListResponse {
    pub activities: Vec<ActivityRecord>,
}

/// Activity recording request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecordActivityRequest {
    pub action: String,
    pub details: String,
}

/// Activity recording response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecordActivityResponse {
    pub message: String,
}

/// List the authenticated user's recent activity, newest first
///
/// Bounded to the default page size of 10 records.
///
/// # Responses
///
/// * `200 OK` - Up to 10 records, timestamp descending
/// * `401 Unauthorized` - No bearer token
/// * `403 Forbidden` - Invalid or expired token
#[utoipa::path(
    get,
    path = "/activities",
    tag = "activities",
    responses(
        (status = 200, description = "Recent activity records", body = ActivityListResponse),
        (status = 401, description = "Missing token", body = crate::error::ApiError),
        (status = 403, description = "Invalid token", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_activities_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, AppError> {
    let ledger = ActivityLedger::new(state.db.clone());
    let activities = ledger.list_recent(user.user_id, DEFAULT_PAGE_SIZE).await?;

    Ok(Json(ActivityListResponse { activities }))
}

/// Record an activity on behalf of the authenticated user
///
/// # Responses
///
/// * `200 OK` - Record appended
/// * `400 Bad Request` - Empty action kind
/// * `401 Unauthorized` - No bearer token
/// * `403 Forbidden` - Invalid or expired token
/// * `500 Internal Server Error` - Storage failure
#[utoipa::path(
    post,
    path = "/activities",
    tag = "activities",
    request_body = RecordActivityRequest,
    responses(
        (status = 200, description = "Activity recorded", body = RecordActivityResponse),
        (status = 400, description = "Invalid input", body = crate::error::ApiError),
        (status = 401, description = "Missing token", body = crate::error::ApiError),
        (status = 403, description = "Invalid token", body = crate::error::ApiError),
        (status = 500, description = "Internal server error", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn record_activity_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<RecordActivityRequest>,
) -> Result<impl IntoResponse, AppError> {
    if request.action.trim().is_empty() {
        return Err(AppError::Validation("Action must not be empty".to_string()));
    }

    let action = ActivityAction::from(request.action.as_str());
    let ledger = ActivityLedger::new(state.db.clone());
    ledger
        .record(user.user_id, &action, &request.details)
        .await?;

    Ok(Json(RecordActivityResponse {
        message: "Activity logged successfully".to_string(),
    }))
}
