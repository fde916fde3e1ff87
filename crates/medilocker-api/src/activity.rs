//! Activity ledger
//!
//! Append-only record of actions taken by an identity. Records are immutable
//! after creation; there are no update or delete operations on this type.
//! The read path orders by timestamp descending and is bounded by the
//! caller's limit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;

/// Page size for the default activity listing
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Well-known activity kinds
///
/// The ledger accepts any kind; these are the ones the auth service writes
/// itself. Unknown kinds round-trip verbatim through `Other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityAction {
    Registration,
    Login,
    ProfileUpdate,
    Other(String),
}

impl ActivityAction {
    pub fn as_str(&self) -> &str {
        match self {
            ActivityAction::Registration => "REGISTRATION",
            ActivityAction::Login => "LOGIN",
            ActivityAction::ProfileUpdate => "PROFILE_UPDATE",
            ActivityAction::Other(s) => s,
        }
    }
}

impl From<&str> for ActivityAction {
    fn from(s: &str) -> Self {
        match s {
            "REGISTRATION" => ActivityAction::Registration,
            "LOGIN" => ActivityAction::Login,
            "PROFILE_UPDATE" => ActivityAction::ProfileUpdate,
            other => ActivityAction::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single ledger entry
///
/// `user_id` is a back-reference by id, not ownership: the ledger holds
/// records for an identity but does not own it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct ActivityRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub action: String,
    pub details: String,
    pub occurred_at: DateTime<Utc>,
}

/// Append-only activity ledger over PostgreSQL
#[derive(Clone)]
pub struct ActivityLedger {
    pool: PgPool,
}

impl ActivityLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append a record for an identity
    ///
    /// Single INSERT; completes or fails before the caller's response is
    /// sent when awaited synchronously.
    pub async fn record(
        &self,
        user_id: Uuid,
        action: &ActivityAction,
        details: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO activities (id, user_id, action, details, occurred_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(action.as_str())
        .bind(details)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// List an identity's most recent records, newest first, bounded by `limit`
    pub async fn list_recent(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<ActivityRecord>, sqlx::Error> {
        sqlx::query_as::<_, ActivityRecord>(
            r#"
            SELECT id, user_id, action, details, occurred_at
            FROM activities
            WHERE user_id = $1
            ORDER BY occurred_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }
}
