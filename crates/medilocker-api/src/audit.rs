//! Security audit logging for authentication events
//!
//! Structured log records for authentication outcomes, emitted at INFO under
//! the dedicated `audit` target so security tooling can route them
//! separately from application logs. This is operational logging; the
//! user-facing trail lives in [`crate::activity`].

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

/// Audit events produced by this service
///
/// Passwords and password hashes never appear in these events.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum AuditEvent {
    RegistrationSuccess {
        user_id: Uuid,
        email: String,
    },

    RegistrationFailure {
        email: String,
        reason: String,
    },

    LoginSuccess {
        user_id: Uuid,
        email: String,
    },

    LoginFailure {
        email: String,
        reason: String,
    },

    /// Invalid or expired token presented to the session guard
    InvalidToken {
        reason: String,
    },

    ProfileUpdate {
        user_id: Uuid,
    },
}

/// Log a security audit event with structured fields
pub fn audit_log(event: &AuditEvent) {
    let event_json = serde_json::to_string(event)
        .unwrap_or_else(|e| format!("{{\"error\":\"Failed to serialize audit event: {e}\"}}"));

    let summary = match event {
        AuditEvent::RegistrationSuccess { .. } => "Registration successful",
        AuditEvent::RegistrationFailure { .. } => "Registration failed",
        AuditEvent::LoginSuccess { .. } => "Login successful",
        AuditEvent::LoginFailure { .. } => "Login failed",
        AuditEvent::InvalidToken { .. } => "Invalid token",
        AuditEvent::ProfileUpdate { .. } => "Profile updated",
    };

    info!(target: "audit", event = %event_json, "{}", summary);
}
