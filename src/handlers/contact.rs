//! Contact-form HTTP handlers.
//!
//! - POST /api/contact - Submit a message (public)
//! - GET /api/contact - Read messages, newest first (admin)

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    error::AppError,
    models::contact::{ContactMessage, NewContactMessage},
    routes::AppState,
    services::content_service,
};

/// # Request Body
///
/// ```json
/// { "name": "Ama", "email": "ama@example.com", "message": "Hello" }
/// ```
///
/// Returns 201 Created with the stored message.
pub async fn submit_message(
    State(state): State<AppState>,
    payload: Result<Json<NewContactMessage>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(message) = payload?;
    let message = content_service::submit_contact_message(state.contact.as_ref(), message).await?;

    Ok((StatusCode::CREATED, Json(message)))
}

pub async fn list_messages(
    State(state): State<AppState>,
) -> Result<Json<Vec<ContactMessage>>, AppError> {
    Ok(Json(state.contact.list().await?))
}
