//! Certificate issuance workflow.
//!
//! This service handles:
//! - Rejecting empty fields, naming the first offender
//! - Deriving the verification link from the certificate number
//! - Persisting the certificate
//!
//! Duplicate certificate numbers are not pre-checked: the store's unique
//! index rejects them, so two concurrent issues of the same number produce
//! exactly one certificate.

use crate::error::AppError;
use crate::models::certificate::{Certificate, CertificateInput, NewCertificate};
use crate::store::CertificateStore;

/// Build the public verification link for a certificate number.
///
/// `base_url` is the externally reachable origin, e.g. `https://salon.example`.
pub fn verify_url(base_url: &str, certificate_number: &str) -> String {
    let encoded: String =
        url::form_urlencoded::byte_serialize(certificate_number.as_bytes()).collect();
    format!(
        "{}/verify?certificate={}",
        base_url.trim_end_matches('/'),
        encoded
    )
}

/// Reject blank string fields, in schema order.
pub fn validate(input: &CertificateInput) -> Result<(), AppError> {
    let fields = [
        ("studentName", &input.student_name),
        ("certificateNumber", &input.certificate_number),
        ("courseName", &input.course_name),
        ("courseDuration", &input.course_duration),
        ("grade", &input.grade),
        ("issueDate", &input.issue_date),
    ];

    for (field, value) in fields {
        if value.trim().is_empty() {
            return Err(AppError::validation(
                field,
                format!("{field} must not be empty"),
            ));
        }
    }

    Ok(())
}

/// Issue a certificate.
///
/// # Process
///
/// 1. Validate the input
/// 2. Derive `verify_url` from `base_url` and the certificate number
/// 3. Use the same link as the QR payload
/// 4. Insert the row
///
/// # Errors
///
/// - `Validation`: empty field, or the certificate number is already taken
/// - `Database`: storage unavailable
///
/// Callers must have passed the admin check first; nothing here authenticates.
pub async fn issue(
    store: &dyn CertificateStore,
    input: CertificateInput,
    base_url: &str,
) -> Result<Certificate, AppError> {
    validate(&input)?;

    let verify_url = verify_url(base_url, &input.certificate_number);
    let certificate = store
        .insert(NewCertificate {
            input,
            qr_code_url: Some(verify_url.clone()),
            verify_url,
        })
        .await?;

    tracing::info!(
        certificate_id = %certificate.id,
        certificate_number = %certificate.certificate_number,
        "certificate issued"
    );
    Ok(certificate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    fn input(number: &str) -> CertificateInput {
        CertificateInput {
            student_name: "Jane Doe".to_string(),
            certificate_number: number.to_string(),
            course_name: "Hair Styling".to_string(),
            course_duration: "2 Months".to_string(),
            attendance_percentage: 95,
            grade: "A".to_string(),
            issue_date: "2025-01-10".to_string(),
            student_photo: None,
        }
    }

    fn invalid_field(err: AppError) -> String {
        match err {
            AppError::Validation {
                field: Some(field), ..
            } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn verify_url_appends_encoded_number() {
        assert_eq!(
            verify_url("https://salon.example", "LUX-2025-001"),
            "https://salon.example/verify?certificate=LUX-2025-001"
        );
        assert_eq!(
            verify_url("https://salon.example/", "A&B 1"),
            "https://salon.example/verify?certificate=A%26B+1"
        );
    }

    #[tokio::test]
    async fn issue_derives_links() {
        let store = MemoryStore::new();
        let certificate = issue(&store, input("LUX-2025-001"), "http://localhost:3000")
            .await
            .unwrap();

        assert!(
            certificate
                .verify_url
                .ends_with("?certificate=LUX-2025-001")
        );
        assert_eq!(
            certificate.qr_code_url.as_deref(),
            Some(certificate.verify_url.as_str())
        );
    }

    #[tokio::test]
    async fn issued_certificate_round_trips_by_number() {
        let store = MemoryStore::new();
        let mut submitted = input("LUX-2025-002");
        submitted.student_photo = Some("data:image/png;base64,AAAA".to_string());
        let created = issue(&store, submitted.clone(), "https://salon.example")
            .await
            .unwrap();

        let found = store.get_by_number("LUX-2025-002").await.unwrap().unwrap();
        assert_eq!(found, created);
        assert_eq!(found.student_name, submitted.student_name);
        assert_eq!(found.course_name, submitted.course_name);
        assert_eq!(found.course_duration, submitted.course_duration);
        assert_eq!(found.attendance_percentage, submitted.attendance_percentage);
        assert_eq!(found.grade, submitted.grade);
        assert_eq!(found.issue_date, submitted.issue_date);
        assert_eq!(found.student_photo, submitted.student_photo);
    }

    #[tokio::test]
    async fn lookup_by_number_is_case_sensitive() {
        let store = MemoryStore::new();
        issue(&store, input("LUX-2025-003"), "https://salon.example")
            .await
            .unwrap();
        assert!(store.get_by_number("lux-2025-003").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_number_is_a_validation_error() {
        let store = MemoryStore::new();
        issue(&store, input("DUP-1"), "https://salon.example")
            .await
            .unwrap();
        let err = issue(&store, input("DUP-1"), "https://salon.example")
            .await
            .unwrap_err();

        assert_eq!(invalid_field(err), "certificateNumber");
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_duplicates_yield_one_certificate() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let attempts = (0..8).map(|_| {
            let store = store.clone();
            tokio::spawn(async move {
                issue(store.as_ref(), input("RACE-1"), "https://salon.example").await
            })
        });

        let mut successes = 0;
        for attempt in attempts.collect::<Vec<_>>() {
            match attempt.await.unwrap() {
                Ok(_) => successes += 1,
                Err(err) => assert_eq!(invalid_field(err), "certificateNumber"),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn first_blank_field_is_named() {
        let store = MemoryStore::new();
        let mut blank = input("BLANK-1");
        blank.course_duration = "  ".to_string();
        blank.grade = String::new();

        let err = issue(&store, blank, "https://salon.example")
            .await
            .unwrap_err();
        assert_eq!(invalid_field(err), "courseDuration");
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_certificate_number_is_rejected() {
        let store = MemoryStore::new();
        let err = issue(&store, input(""), "https://salon.example")
            .await
            .unwrap_err();
        assert_eq!(invalid_field(err), "certificateNumber");
    }
}
