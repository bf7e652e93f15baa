//! Persistence seams.
//!
//! Handlers and services never touch SQL directly; they go through these
//! traits so that the session backend can be swapped per deployment and the
//! HTTP layer can be exercised without a database.
//!
//! Stores surface storage failures as [`AppError::Database`]. "Not found" is
//! an `Ok(None)`, never an error; deletes of absent rows succeed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{
    admin_user::AdminUser,
    certificate::{Certificate, NewCertificate},
    contact::{ContactMessage, NewContactMessage},
    gallery::{GalleryItem, NewGalleryItem},
    session::Session,
};

#[cfg(test)]
pub mod memory;
pub mod memory_sessions;
pub mod postgres;

pub use memory_sessions::MemorySessionStore;
pub use postgres::PgStore;

/// Admin principals.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Exact, case-sensitive lookup.
    async fn find_by_username(&self, username: &str) -> Result<Option<AdminUser>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AdminUser>, AppError>;

    /// Fails with [`AppError::Conflict`] if the username is taken.
    async fn create(&self, username: &str, password_hash: &str) -> Result<AdminUser, AppError>;

    async fn delete_by_id(&self, id: Uuid) -> Result<(), AppError>;
}

/// Issued certificates.
#[async_trait]
pub trait CertificateStore: Send + Sync {
    /// All certificates, most recently created first.
    async fn list(&self) -> Result<Vec<Certificate>, AppError>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Certificate>, AppError>;

    /// Public verification lookup, exact match.
    async fn get_by_number(&self, certificate_number: &str)
    -> Result<Option<Certificate>, AppError>;

    /// Fails with a validation error on `certificateNumber` if the number is taken.
    async fn insert(&self, certificate: NewCertificate) -> Result<Certificate, AppError>;

    async fn delete_by_id(&self, id: Uuid) -> Result<(), AppError>;
}

#[async_trait]
pub trait GalleryStore: Send + Sync {
    async fn list(&self) -> Result<Vec<GalleryItem>, AppError>;

    async fn insert(&self, item: NewGalleryItem) -> Result<GalleryItem, AppError>;

    async fn delete_by_id(&self, id: Uuid) -> Result<(), AppError>;
}

#[async_trait]
pub trait ContactStore: Send + Sync {
    /// All messages, newest first.
    async fn list(&self) -> Result<Vec<ContactMessage>, AppError>;

    async fn insert(&self, message: NewContactMessage) -> Result<ContactMessage, AppError>;
}

/// Login sessions, keyed by the SHA-256 of the session token.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert(&self, session: Session) -> Result<(), AppError>;

    /// Returns the session only if it has not expired at `now`.
    async fn find(&self, token_hash: &str, now: DateTime<Utc>)
    -> Result<Option<Session>, AppError>;

    async fn delete(&self, token_hash: &str) -> Result<(), AppError>;

    /// Drop every session expired at `now`, returning how many were removed.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError>;
}
