//! API route definitions

use crate::auth::middleware::auth_middleware;
use crate::handlers::{activities, auth, profile};
use crate::state::AppState;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Create API routes
///
/// The session guard is layered on the protected set only; registration and
/// login stay public.
pub fn api_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/register", post(auth::register_handler))
        .route("/login", post(auth::login_handler));

    // Protected routes (valid bearer token required)
    let protected_routes = Router::new()
        .route(
            "/profile",
            get(profile::get_profile_handler).put(profile::update_profile_handler),
        )
        .route(
            "/activities",
            get(activities::list_activities_handler).post(activities::record_activity_handler),
        )
        .layer(middleware::from_fn_with_state(state, auth_middleware));

    // Combine routes
    Router::new().merge(public_routes).merge(protected_routes)
}
