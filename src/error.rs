//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// Each variant maps to a specific HTTP status code and error message.
///
/// # Error Categories
///
/// - **Validation Errors**: Missing or malformed input, duplicate certificate numbers
/// - **Authentication Errors**: Missing session, wrong credentials
/// - **Resource Errors**: Requested certificate not found
/// - **Storage Errors**: Any sqlx::Error from database operations
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, query error).
    ///
    /// Returns HTTP 500. The underlying error is logged but never sent to the client.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Request body is invalid.
    ///
    /// Returns HTTP 400 Bad Request, naming the first offending field when known.
    #[error("{message}")]
    Validation {
        field: Option<String>,
        message: String,
    },

    /// A privileged route was called without a valid session.
    ///
    /// Returns HTTP 401 Unauthorized.
    #[error("Unauthorized")]
    Unauthorized,

    /// Login failed.
    ///
    /// The message is identical for an unknown username and a wrong password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Requested resource does not exist.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A uniquely-keyed record already exists.
    ///
    /// Returns HTTP 409 Conflict.
    #[error("{0}")]
    Conflict(String),

    /// Failure outside the database, such as a panicked hashing task.
    ///
    /// Returns HTTP 500.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Build a validation error for a named request field.
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: Some(field.to_string()),
            message: message.into(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation {
            field: None,
            message: rejection.body_text(),
        }
    }
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// ```json
/// {
///   "code": "validation_error",
///   "message": "studentName must not be empty",
///   "field": "studentName"
/// }
/// ```
///
/// `field` is only present on validation errors.
///
/// # Status Code Mapping
///
/// - `Validation` → 400 Bad Request
/// - `Unauthorized`, `InvalidCredentials` → 401 Unauthorized
/// - `NotFound` → 404 Not Found
/// - `Conflict` → 409 Conflict
/// - `Database`, `Internal` → 500 Internal Server Error (hides details from client)
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, field) = match self {
            AppError::Validation {
                ref field,
                ref message,
            } => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                message.clone(),
                field.clone(),
            ),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                self.to_string(),
                None,
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                self.to_string(),
                None,
            ),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", self.to_string(), None),
            AppError::Conflict(ref msg) => (StatusCode::CONFLICT, "conflict", msg.clone(), None),
            AppError::Database(ref e) => {
                tracing::error!(error = %e, "storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
            AppError::Internal(ref msg) => {
                tracing::error!(error = %msg, "internal failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let mut body = json!({
            "code": code,
            "message": message,
        });
        if let Some(field) = field {
            body["field"] = json!(field);
        }

        (status, Json(body)).into_response()
    }
}
