//! Certificate data models and API request/response types.
//!
//! This module defines:
//! - `Certificate`: Database entity and JSON response body
//! - `CertificateRequest`: Issuance request body as received
//! - `CertificateInput`: Checked caller-supplied fields
//! - `NewCertificate`: Input plus the server-derived verification links

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::IgnoredAny};
use uuid::Uuid;

use crate::error::AppError;

/// An issued course-completion certificate.
///
/// # Database Table
///
/// Maps to the `certificates` table. `certificate_number` carries a unique
/// index; that index is what rejects duplicates, including concurrent ones.
///
/// # JSON
///
/// Serialized with camelCase keys:
///
/// ```json
/// {
///   "id": "550e8400-e29b-41d4-a716-446655440000",
///   "studentName": "Jane Doe",
///   "certificateNumber": "LUX-2025-001",
///   "courseName": "Hair Styling",
///   "courseDuration": "2 Months",
///   "attendancePercentage": 95,
///   "grade": "A",
///   "issueDate": "2025-01-10",
///   "studentPhoto": null,
///   "verifyUrl": "https://salon.example/verify?certificate=LUX-2025-001",
///   "qrCodeUrl": "https://salon.example/verify?certificate=LUX-2025-001",
///   "createdAt": "2025-01-10T09:00:00Z"
/// }
/// ```
///
/// Certificates are never updated. They are only created and deleted.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub id: Uuid,
    pub student_name: String,

    /// Public identifier printed on the certificate and used for verification
    pub certificate_number: String,

    pub course_name: String,
    pub course_duration: String,

    /// Expected to be 0-100 but not range-checked
    pub attendance_percentage: i32,

    pub grade: String,

    /// Calendar date as supplied (ISO string), not a timestamp
    pub issue_date: String,

    /// URL or embedded image data
    pub student_photo: Option<String>,

    /// Verification page link, always derived from `certificate_number`
    pub verify_url: String,

    /// Payload for the QR code the front-end renders; same as `verify_url`
    pub qr_code_url: Option<String>,

    pub created_at: DateTime<Utc>,
}

/// Caller-supplied certificate fields.
///
/// `id`, `createdAt`, `verifyUrl` and `qrCodeUrl` are server-assigned; if a
/// request body contains them they are ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct CertificateInput {
    pub student_name: String,
    pub certificate_number: String,
    pub course_name: String,
    pub course_duration: String,
    pub attendance_percentage: i32,
    pub grade: String,
    pub issue_date: String,
    pub student_photo: Option<String>,
}

/// Body of an issuance request.
///
/// Every field is optional and tolerates a value of the wrong JSON type, so
/// that conversion into [`CertificateInput`] can name the first bad field
/// instead of failing the whole body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRequest {
    pub student_name: Option<Field<String>>,
    pub certificate_number: Option<Field<String>>,
    pub course_name: Option<Field<String>>,
    pub course_duration: Option<Field<String>>,
    pub attendance_percentage: Option<Field<i32>>,
    pub grade: Option<Field<String>>,
    pub issue_date: Option<Field<String>>,
    pub student_photo: Option<Field<String>>,
}

/// A request field as received: either the expected type or anything else.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Field<T> {
    Valid(T),
    Mistyped(IgnoredAny),
}

impl TryFrom<CertificateRequest> for CertificateInput {
    type Error = AppError;

    /// Fields are checked in declaration order and the first missing or
    /// mistyped one is named in the returned validation error. Emptiness is
    /// checked later by the issuance workflow.
    fn try_from(request: CertificateRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            student_name: required(request.student_name, "studentName", "a string")?,
            certificate_number: required(
                request.certificate_number,
                "certificateNumber",
                "a string",
            )?,
            course_name: required(request.course_name, "courseName", "a string")?,
            course_duration: required(request.course_duration, "courseDuration", "a string")?,
            attendance_percentage: required(
                request.attendance_percentage,
                "attendancePercentage",
                "an integer",
            )?,
            grade: required(request.grade, "grade", "a string")?,
            issue_date: required(request.issue_date, "issueDate", "a string")?,
            student_photo: match request.student_photo {
                None => None,
                Some(Field::Valid(photo)) if photo.is_empty() => None,
                Some(Field::Valid(photo)) => Some(photo),
                Some(Field::Mistyped(_)) => {
                    return Err(AppError::validation(
                        "studentPhoto",
                        "studentPhoto must be a string",
                    ));
                }
            },
        })
    }
}

fn required<T>(value: Option<Field<T>>, field: &str, expected: &str) -> Result<T, AppError> {
    match value {
        Some(Field::Valid(value)) => Ok(value),
        Some(Field::Mistyped(_)) => Err(AppError::validation(
            field,
            format!("{field} must be {expected}"),
        )),
        None => Err(AppError::validation(field, format!("{field} is required"))),
    }
}

/// Row about to be inserted: validated input plus derived links.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCertificate {
    pub input: CertificateInput,
    pub verify_url: String,
    pub qr_code_url: Option<String>,
}
