//! Server-side login session record.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A login session bound to one admin.
///
/// # Database Table
///
/// Maps to the `admin_sessions` table when the Postgres session backend is used.
///
/// Only the SHA-256 of the session token is kept. The raw token lives in the
/// signed cookie held by the browser.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Session {
    /// Hex SHA-256 of the opaque session token
    pub token_hash: String,

    /// Admin the session was issued to
    ///
    /// Weak reference: no foreign key. Lookups treat a missing admin as anonymous.
    pub admin_user_id: Uuid,

    /// Absolute expiry; activity does not extend it
    pub expires_at: DateTime<Utc>,

    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
