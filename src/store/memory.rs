//! In-memory stores used by the test suite.
//!
//! They honour the same contracts as [`super::PgStore`], including the
//! username and certificate-number uniqueness checks, which are done under a
//! single lock so that concurrent inserts race the same way they would
//! against a unique index.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{CertificateStore, ContactStore, CredentialStore, GalleryStore};
use crate::error::AppError;
use crate::models::{
    admin_user::AdminUser,
    certificate::{Certificate, NewCertificate},
    contact::{ContactMessage, NewContactMessage},
    gallery::{GalleryItem, NewGalleryItem},
};

/// Rows are kept in insertion order; listing walks them backwards to get
/// newest-first without depending on clock resolution.
#[derive(Debug, Default)]
pub struct MemoryStore {
    admins: Mutex<Vec<AdminUser>>,
    certificates: Mutex<Vec<Certificate>>,
    gallery: Mutex<Vec<GalleryItem>>,
    contact: Mutex<Vec<ContactMessage>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn admin_count(&self) -> usize {
        self.admins.lock().unwrap().len()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<AdminUser>, AppError> {
        let admins = self.admins.lock().unwrap();
        Ok(admins.iter().find(|a| a.username == username).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AdminUser>, AppError> {
        let admins = self.admins.lock().unwrap();
        Ok(admins.iter().find(|a| a.id == id).cloned())
    }

    async fn create(&self, username: &str, password_hash: &str) -> Result<AdminUser, AppError> {
        let mut admins = self.admins.lock().unwrap();
        if admins.iter().any(|a| a.username == username) {
            return Err(AppError::Conflict(format!(
                "Username {username} already exists"
            )));
        }
        let admin = AdminUser {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        admins.push(admin.clone());
        Ok(admin)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), AppError> {
        self.admins.lock().unwrap().retain(|a| a.id != id);
        Ok(())
    }
}

#[async_trait]
impl CertificateStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Certificate>, AppError> {
        let certificates = self.certificates.lock().unwrap();
        Ok(certificates.iter().rev().cloned().collect())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Certificate>, AppError> {
        let certificates = self.certificates.lock().unwrap();
        Ok(certificates.iter().find(|c| c.id == id).cloned())
    }

    async fn get_by_number(
        &self,
        certificate_number: &str,
    ) -> Result<Option<Certificate>, AppError> {
        let certificates = self.certificates.lock().unwrap();
        Ok(certificates
            .iter()
            .find(|c| c.certificate_number == certificate_number)
            .cloned())
    }

    async fn insert(&self, certificate: NewCertificate) -> Result<Certificate, AppError> {
        let mut certificates = self.certificates.lock().unwrap();
        let NewCertificate {
            input,
            verify_url,
            qr_code_url,
        } = certificate;
        if certificates
            .iter()
            .any(|c| c.certificate_number == input.certificate_number)
        {
            return Err(AppError::validation(
                "certificateNumber",
                "Certificate number already exists",
            ));
        }
        let created = Certificate {
            id: Uuid::new_v4(),
            student_name: input.student_name,
            certificate_number: input.certificate_number,
            course_name: input.course_name,
            course_duration: input.course_duration,
            attendance_percentage: input.attendance_percentage,
            grade: input.grade,
            issue_date: input.issue_date,
            student_photo: input.student_photo,
            verify_url,
            qr_code_url,
            created_at: Utc::now(),
        };
        certificates.push(created.clone());
        Ok(created)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), AppError> {
        self.certificates.lock().unwrap().retain(|c| c.id != id);
        Ok(())
    }
}

#[async_trait]
impl GalleryStore for MemoryStore {
    async fn list(&self) -> Result<Vec<GalleryItem>, AppError> {
        let gallery = self.gallery.lock().unwrap();
        Ok(gallery.iter().rev().cloned().collect())
    }

    async fn insert(&self, item: NewGalleryItem) -> Result<GalleryItem, AppError> {
        let created = GalleryItem {
            id: Uuid::new_v4(),
            title: item.title,
            image_url: item.image_url,
            category: item.category,
            created_at: Utc::now(),
        };
        self.gallery.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), AppError> {
        self.gallery.lock().unwrap().retain(|g| g.id != id);
        Ok(())
    }
}

#[async_trait]
impl ContactStore for MemoryStore {
    async fn list(&self) -> Result<Vec<ContactMessage>, AppError> {
        let contact = self.contact.lock().unwrap();
        Ok(contact.iter().rev().cloned().collect())
    }

    async fn insert(&self, message: NewContactMessage) -> Result<ContactMessage, AppError> {
        let created = ContactMessage {
            id: Uuid::new_v4(),
            name: message.name,
            email: message.email,
            message: message.message,
            created_at: Utc::now(),
        };
        self.contact.lock().unwrap().push(created.clone());
        Ok(created)
    }
}
