//! PostgreSQL implementations of the store traits.
//!
//! Every method is a single statement, so there are no transactions to manage:
//! each insert or delete is atomic on its own, and uniqueness is left to the
//! unique indexes created by the migrations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{CertificateStore, ContactStore, CredentialStore, GalleryStore, SessionStore};
use crate::db::{DbPool, is_unique_violation};
use crate::error::AppError;
use crate::models::{
    admin_user::AdminUser,
    certificate::{Certificate, NewCertificate},
    contact::{ContactMessage, NewContactMessage},
    gallery::{GalleryItem, NewGalleryItem},
    session::Session,
};

const CERTIFICATE_COLUMNS: &str = "id, student_name, certificate_number, course_name, \
     course_duration, attendance_percentage, grade, issue_date, student_photo, \
     verify_url, qr_code_url, created_at";

/// Postgres-backed store shared by all handlers.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<AdminUser>, AppError> {
        let user = sqlx::query_as::<_, AdminUser>(
            "SELECT id, username, password_hash, created_at FROM admin_users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AdminUser>, AppError> {
        let user = sqlx::query_as::<_, AdminUser>(
            "SELECT id, username, password_hash, created_at FROM admin_users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create(&self, username: &str, password_hash: &str) -> Result<AdminUser, AppError> {
        sqlx::query_as::<_, AdminUser>(
            r#"
            INSERT INTO admin_users (id, username, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, password_hash, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict(format!("Username {username} already exists"))
            } else {
                AppError::Database(e)
            }
        })
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM admin_users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl CertificateStore for PgStore {
    async fn list(&self) -> Result<Vec<Certificate>, AppError> {
        let certificates = sqlx::query_as::<_, Certificate>(&format!(
            "SELECT {CERTIFICATE_COLUMNS} FROM certificates ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(certificates)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Certificate>, AppError> {
        let certificate = sqlx::query_as::<_, Certificate>(&format!(
            "SELECT {CERTIFICATE_COLUMNS} FROM certificates WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(certificate)
    }

    async fn get_by_number(
        &self,
        certificate_number: &str,
    ) -> Result<Option<Certificate>, AppError> {
        let certificate = sqlx::query_as::<_, Certificate>(&format!(
            "SELECT {CERTIFICATE_COLUMNS} FROM certificates WHERE certificate_number = $1"
        ))
        .bind(certificate_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(certificate)
    }

    async fn insert(&self, certificate: NewCertificate) -> Result<Certificate, AppError> {
        let NewCertificate {
            input,
            verify_url,
            qr_code_url,
        } = certificate;

        sqlx::query_as::<_, Certificate>(&format!(
            r#"
            INSERT INTO certificates (
                id,
                student_name,
                certificate_number,
                course_name,
                course_duration,
                attendance_percentage,
                grade,
                issue_date,
                student_photo,
                verify_url,
                qr_code_url
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {CERTIFICATE_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(input.student_name)
        .bind(input.certificate_number)
        .bind(input.course_name)
        .bind(input.course_duration)
        .bind(input.attendance_percentage)
        .bind(input.grade)
        .bind(input.issue_date)
        .bind(input.student_photo)
        .bind(verify_url)
        .bind(qr_code_url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::validation("certificateNumber", "Certificate number already exists")
            } else {
                AppError::Database(e)
            }
        })
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM certificates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl GalleryStore for PgStore {
    async fn list(&self) -> Result<Vec<GalleryItem>, AppError> {
        let items = sqlx::query_as::<_, GalleryItem>(
            "SELECT id, title, image_url, category, created_at FROM gallery_items ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn insert(&self, item: NewGalleryItem) -> Result<GalleryItem, AppError> {
        let item = sqlx::query_as::<_, GalleryItem>(
            r#"
            INSERT INTO gallery_items (id, title, image_url, category)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, image_url, category, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(item.title)
        .bind(item.image_url)
        .bind(item.category)
        .fetch_one(&self.pool)
        .await?;

        Ok(item)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM gallery_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl ContactStore for PgStore {
    async fn list(&self) -> Result<Vec<ContactMessage>, AppError> {
        let messages = sqlx::query_as::<_, ContactMessage>(
            "SELECT id, name, email, message, created_at FROM contact_messages ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    async fn insert(&self, message: NewContactMessage) -> Result<ContactMessage, AppError> {
        let message = sqlx::query_as::<_, ContactMessage>(
            r#"
            INSERT INTO contact_messages (id, name, email, message)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, message, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(message.name)
        .bind(message.email)
        .bind(message.message)
        .fetch_one(&self.pool)
        .await?;

        Ok(message)
    }
}

#[async_trait]
impl SessionStore for PgStore {
    async fn insert(&self, session: Session) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO admin_sessions (token_hash, admin_user_id, expires_at, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(session.token_hash)
        .bind(session.admin_user_id)
        .bind(session.expires_at)
        .bind(session.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Session>, AppError> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT token_hash, admin_user_id, expires_at, created_at
            FROM admin_sessions
            WHERE token_hash = $1 AND expires_at > $2
            "#,
        )
        .bind(token_hash)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    async fn delete(&self, token_hash: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM admin_sessions WHERE token_hash = $1")
            .bind(token_hash)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let removed = sqlx::query("DELETE FROM admin_sessions WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(removed)
    }
}
