//! Admin principal model and the login request/response types.
//!
//! Admin users are created only by the startup seed routine; there is no
//! registration endpoint. Passwords are stored as `<hex-key>.<hex-salt>`
//! produced by [`crate::services::password::PasswordService`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents an admin record from the database.
///
/// # Database Table
///
/// Maps to the `admin_users` table. `username` carries a unique index and is
/// matched case-sensitively.
#[derive(Clone, sqlx::FromRow)]
pub struct AdminUser {
    /// Unique identifier, referenced by sessions
    pub id: Uuid,

    /// Login name (unique, case-sensitive)
    pub username: String,

    /// Encoded Argon2id key and salt
    ///
    /// Never serialized and never logged; `Debug` redacts it.
    pub password_hash: String,

    pub created_at: DateTime<Utc>,
}

impl fmt::Debug for AdminUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminUser")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Request body for `POST /api/login`.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Public view of the logged-in admin returned by `GET /api/user`.
///
/// ```json
/// { "id": "550e8400-e29b-41d4-a716-446655440000", "username": "owner" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: Uuid,
    pub username: String,
}

impl From<AdminUser> for CurrentUser {
    fn from(user: AdminUser) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

/// `{ "message": "..." }` body used by the login and logout endpoints.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
