//! API Integration Tests
//!
//! Tests marked with #[ignore] require a real Postgres database. To run
//! them, point TEST_DATABASE_URL at a migrated test database and run:
//! cargo test -- --ignored
//!
//! The remaining tests run against a lazily-connected pool: the session
//! guard and input validation reject requests before any query is issued.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use medilocker_api::auth::jwt::{generate_token, Claims, JwtConfig};
use medilocker_api::{create_router_for_testing, TEST_JWT_SECRET};
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};
use tower::ServiceExt;
use uuid::Uuid;

/// Helper to create a test request
fn create_json_request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");

    match body {
        Some(json_body) => builder
            .body(Body::from(serde_json::to_string(&json_body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: TEST_JWT_SECRET.to_string(),
        expiration_secs: 86400,
        issuer: "medilocker-api".to_string(),
    }
}

async fn response_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

// =============================================================================
// Health Check Tests
// =============================================================================

#[tokio::test]
async fn test_health_check() {
    let app = create_router_for_testing();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_openapi_spec_available() {
    let app = create_router_for_testing();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api-docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    assert!(json["openapi"].is_string());
    assert!(json["paths"]["/register"].is_object());
    assert!(json["paths"]["/profile"].is_object());
}

// =============================================================================
// Input Validation Tests (rejected before storage is touched)
// =============================================================================

#[tokio::test]
async fn test_register_invalid_email_rejected() {
    let app = create_router_for_testing();

    let request = create_json_request(
        "POST",
        "/register",
        Some(json!({
            "name": "A",
            "email": "not-an-email",
            "password": "secret-password"
        })),
    );

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = response_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_register_short_password_rejected() {
    let app = create_router_for_testing();

    let request = create_json_request(
        "POST",
        "/register",
        Some(json!({
            "name": "A",
            "email": "a@x.com",
            "password": "short"
        })),
    );

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = response_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

// =============================================================================
// Session Guard Tests (no database required)
// =============================================================================

#[tokio::test]
async fn test_profile_without_token_returns_401() {
    let app = create_router_for_testing();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/profile")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = response_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_activities_without_token_returns_401() {
    let app = create_router_for_testing();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/activities")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_bearer_authorization_returns_401() {
    let app = create_router_for_testing();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/profile")
                .header("Authorization", "Basic dXNlcjpwYXNz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_with_garbage_token_returns_403() {
    let app = create_router_for_testing();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/profile")
                .header("Authorization", "Bearer invalid.jwt.token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let json = response_json(response).await;
    assert_eq!(json["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_profile_with_expired_token_returns_403() {
    let app = create_router_for_testing();

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs();

    // Correctly signed token whose expiry is forced into the past
    let claims = Claims {
        iss: "medilocker-api".to_string(),
        sub: Uuid::new_v4().to_string(),
        email: "a@x.com".to_string(),
        iat: now - 7200,
        exp: now - 3600,
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/profile")
                .header("Authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_profile_with_tampered_token_returns_403() {
    let app = create_router_for_testing();

    let token = generate_token(&test_jwt_config(), Uuid::new_v4(), "a@x.com").unwrap();

    // Flip the first character of the signature segment
    let mut parts: Vec<String> = token.split('.').map(|s| s.to_string()).collect();
    let sig = parts[2].clone();
    let flipped: char = if sig.starts_with('A') { 'B' } else { 'A' };
    parts[2] = format!("{}{}", flipped, &sig[1..]);
    let tampered = parts.join(".");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/profile")
                .header("Authorization", format!("Bearer {tampered}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// =============================================================================
// Authentication Flow Tests
// =============================================================================
// Note: These tests require a real database connection

#[tokio::test]
#[ignore = "requires database"]
async fn test_register_success() {
    let app = create_router_for_testing();

    let request = create_json_request(
        "POST",
        "/register",
        Some(json!({
            "name": "A",
            "email": "a@x.com",
            "password": "secret-password-1"
        })),
    );

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let json = response_json(response).await;
    assert!(json["token"].is_string());
    assert!(!json["token"].as_str().unwrap().is_empty());
    assert_eq!(json["user"]["name"], "A");
    assert_eq!(json["user"]["email"], "a@x.com");
    assert!(json["user"]["id"].is_string());
    assert!(json["user"].get("password_hash").is_none());
    assert!(json["user"].get("password").is_none());
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_register_duplicate_email() {
    let app = create_router_for_testing();

    let request1 = create_json_request(
        "POST",
        "/register",
        Some(json!({
            "name": "User One",
            "email": "duplicate@x.com",
            "password": "secret-password-1"
        })),
    );
    let first = app.clone().oneshot(request1).await.unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    // Second registration with the same email must be rejected
    let request2 = create_json_request(
        "POST",
        "/register",
        Some(json!({
            "name": "User Two",
            "email": "duplicate@x.com",
            "password": "different-password-2"
        })),
    );

    let response = app.oneshot(request2).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = response_json(response).await;
    assert_eq!(json["code"], "DUPLICATE_EMAIL");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_login_success() {
    let app = create_router_for_testing();

    let register_request = create_json_request(
        "POST",
        "/register",
        Some(json!({
            "name": "Login Test User",
            "email": "logintest@x.com",
            "password": "secret-password-1"
        })),
    );
    app.clone().oneshot(register_request).await.unwrap();

    let login_request = create_json_request(
        "POST",
        "/login",
        Some(json!({
            "email": "logintest@x.com",
            "password": "secret-password-1"
        })),
    );

    let response = app.oneshot(login_request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    assert!(json["token"].is_string());
    assert_eq!(json["user"]["email"], "logintest@x.com");
    assert_eq!(json["user"]["name"], "Login Test User");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_login_failures_are_indistinguishable() {
    let app = create_router_for_testing();

    let register_request = create_json_request(
        "POST",
        "/register",
        Some(json!({
            "name": "A",
            "email": "exists@x.com",
            "password": "correct-password"
        })),
    );
    app.clone().oneshot(register_request).await.unwrap();

    // Existing email, wrong password
    let wrong_password = create_json_request(
        "POST",
        "/login",
        Some(json!({
            "email": "exists@x.com",
            "password": "wrong-password"
        })),
    );
    let response1 = app.clone().oneshot(wrong_password).await.unwrap();
    let status1 = response1.status();
    let body1 = axum::body::to_bytes(response1.into_body(), usize::MAX)
        .await
        .unwrap();

    // Unknown email
    let unknown_email = create_json_request(
        "POST",
        "/login",
        Some(json!({
            "email": "z@x.com",
            "password": "whatever-password"
        })),
    );
    let response2 = app.oneshot(unknown_email).await.unwrap();
    let status2 = response2.status();
    let body2 = axum::body::to_bytes(response2.into_body(), usize::MAX)
        .await
        .unwrap();

    // Byte-identical status and body: callers cannot probe registered emails
    assert_eq!(status1, StatusCode::BAD_REQUEST);
    assert_eq!(status1, status2);
    assert_eq!(body1, body2);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_profile_with_issued_token() {
    let app = create_router_for_testing();

    let register_request = create_json_request(
        "POST",
        "/register",
        Some(json!({
            "name": "Profile User",
            "email": "profile@x.com",
            "password": "secret-password-1"
        })),
    );
    let register_response = app.clone().oneshot(register_request).await.unwrap();
    let register_json = response_json(register_response).await;
    let token = register_json["token"].as_str().unwrap().to_string();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/profile")
                .header("Authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    assert_eq!(json["user"]["name"], "Profile User");
    assert!(json["user"].get("password_hash").is_none());
    assert!(json["user"].get("password").is_none());
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_update_profile() {
    let app = create_router_for_testing();

    let register_request = create_json_request(
        "POST",
        "/register",
        Some(json!({
            "name": "Old Name",
            "email": "rename@x.com",
            "password": "secret-password-1"
        })),
    );
    let register_response = app.clone().oneshot(register_request).await.unwrap();
    let register_json = response_json(register_response).await;
    let token = register_json["token"].as_str().unwrap().to_string();

    let update_request = Request::builder()
        .method("PUT")
        .uri("/profile")
        .header("Content-Type", "application/json")
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::from(
            serde_json::to_string(&json!({"name": "New Name"})).unwrap(),
        ))
        .unwrap();

    let response = app.clone().oneshot(update_request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    assert_eq!(json["user"]["name"], "New Name");

    // The rename shows up in the ledger
    let activities_response = app
        .oneshot(
            Request::builder()
                .uri("/activities")
                .header("Authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let activities_json = response_json(activities_response).await;
    let actions: Vec<&str> = activities_json["activities"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["action"].as_str().unwrap())
        .collect();
    assert!(actions.contains(&"PROFILE_UPDATE"));
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_activity_ledger_flow() {
    let app = create_router_for_testing();

    let register_request = create_json_request(
        "POST",
        "/register",
        Some(json!({
            "name": "Ledger User",
            "email": "ledger@x.com",
            "password": "secret-password-1"
        })),
    );
    let register_response = app.clone().oneshot(register_request).await.unwrap();
    let register_json = response_json(register_response).await;
    let token = register_json["token"].as_str().unwrap().to_string();

    // Registration itself wrote the first ledger entry
    let list_response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/activities")
                .header("Authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(list_response.status(), StatusCode::OK);
    let list_json = response_json(list_response).await;
    let activities = list_json["activities"].as_array().unwrap();
    assert_eq!(activities.len(), 1);
    assert_eq!(activities[0]["action"], "REGISTRATION");

    // Append a dozen records, then verify the page bound and ordering
    for i in 0..12 {
        let record_request = Request::builder()
            .method("POST")
            .uri("/activities")
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {token}"))
            .body(Body::from(
                serde_json::to_string(&json!({
                    "action": "DOCUMENT_VIEW",
                    "details": format!("Viewed document {i}")
                }))
                .unwrap(),
            ))
            .unwrap();

        let response = app.clone().oneshot(record_request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let list_response = app
        .oneshot(
            Request::builder()
                .uri("/activities")
                .header("Authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let list_json = response_json(list_response).await;
    let activities = list_json["activities"].as_array().unwrap();

    // Never more than the page size, newest first
    assert_eq!(activities.len(), 10);
    let timestamps: Vec<chrono::DateTime<chrono::FixedOffset>> = activities
        .iter()
        .map(|a| {
            chrono::DateTime::parse_from_rfc3339(a["occurred_at"].as_str().unwrap()).unwrap()
        })
        .collect();
    for pair in timestamps.windows(2) {
        assert!(pair[0] >= pair[1]);
    }
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_record_activity_empty_action_rejected() {
    let app = create_router_for_testing();

    let register_request = create_json_request(
        "POST",
        "/register",
        Some(json!({
            "name": "A",
            "email": "emptyaction@x.com",
            "password": "secret-password-1"
        })),
    );
    let register_response = app.clone().oneshot(register_request).await.unwrap();
    let register_json = response_json(register_response).await;
    let token = register_json["token"].as_str().unwrap().to_string();

    let record_request = Request::builder()
        .method("POST")
        .uri("/activities")
        .header("Content-Type", "application/json")
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::from(
            serde_json::to_string(&json!({"action": "  ", "details": "x"})).unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(record_request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
