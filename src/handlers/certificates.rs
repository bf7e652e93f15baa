//! Certificate HTTP handlers.
//!
//! This module implements the certificate API endpoints:
//! - GET /api/certificates - List all certificates (public)
//! - GET /api/certificates/:id - Get certificate by ID (public)
//! - GET /api/certificates/verify/:number - Public verification lookup
//! - POST /api/certificates - Issue a certificate (admin)
//! - DELETE /api/certificates/:id - Delete a certificate (admin)

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    error::AppError,
    middleware::{auth::AuthContext, origin::RequestOrigin},
    models::certificate::{Certificate, CertificateInput, CertificateRequest},
    routes::AppState,
    services::certificate_service,
};

/// List all certificates, most recently issued first.
pub async fn list_certificates(
    State(state): State<AppState>,
) -> Result<Json<Vec<Certificate>>, AppError> {
    let certificates = state.certificates.list().await?;

    Ok(Json(certificates))
}

/// Get a certificate by ID.
///
/// An ID that is not a UUID cannot match anything and is reported as 404.
///
/// # Response
///
/// - **Success (200 OK)**: The certificate
/// - **Error (404)**: No such certificate
pub async fn get_certificate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Certificate>, AppError> {
    let id = Uuid::parse_str(&id).map_err(|_| AppError::NotFound("Certificate"))?;
    let certificate = state
        .certificates
        .get_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Certificate"))?;

    Ok(Json(certificate))
}

/// Verify a certificate by its public number.
///
/// This is what the QR code on a printed certificate leads to, so it needs
/// no session. Matching is exact and case-sensitive.
pub async fn verify_certificate(
    State(state): State<AppState>,
    Path(certificate_number): Path<String>,
) -> Result<Json<Certificate>, AppError> {
    let certificate = state
        .certificates
        .get_by_number(&certificate_number)
        .await?
        .ok_or(AppError::NotFound("Certificate"))?;

    Ok(Json(certificate))
}

/// Issue a new certificate.
///
/// # Request Body
///
/// ```json
/// {
///   "studentName": "Jane Doe",
///   "certificateNumber": "LUX-2025-001",
///   "courseName": "Hair Styling",
///   "courseDuration": "2 Months",
///   "attendancePercentage": 95,
///   "grade": "A",
///   "issueDate": "2025-01-10",
///   "studentPhoto": "https://..."   // optional
/// }
/// ```
///
/// # Response
///
/// - **Success (201 Created)**: The certificate, with `verifyUrl` and `qrCodeUrl`
///   built from this request's public origin
/// - **Error (400)**: First invalid field, or the number is already taken
/// - **Error (401)**: Not logged in (rejected by middleware)
pub async fn create_certificate(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    RequestOrigin(origin): RequestOrigin,
    payload: Result<Json<CertificateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload?;
    let input = CertificateInput::try_from(request)?;

    let certificate =
        certificate_service::issue(state.certificates.as_ref(), input, &origin).await?;
    tracing::debug!(issued_by = %auth.username, certificate_id = %certificate.id, "issue request served");

    Ok((StatusCode::CREATED, Json(certificate)))
}

/// Delete a certificate.
///
/// # Response
///
/// Returns 204 No Content whether or not the certificate existed.
pub async fn delete_certificate(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    // Nothing can have an ID that is not a UUID, so there is nothing to delete.
    if let Ok(id) = Uuid::parse_str(&id) {
        state.certificates.delete_by_id(id).await?;
        tracing::info!(certificate_id = %id, admin_id = %auth.admin_user_id, "certificate deleted");
    }

    Ok(StatusCode::NO_CONTENT)
}
