//! Gallery HTTP handlers.
//!
//! - GET /api/gallery - Public list
//! - POST /api/gallery - Add an item (admin)
//! - DELETE /api/gallery/:id - Remove an item (admin)

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::gallery::{GalleryItem, NewGalleryItem},
    routes::AppState,
    services::content_service,
};

pub async fn list_gallery(
    State(state): State<AppState>,
) -> Result<Json<Vec<GalleryItem>>, AppError> {
    Ok(Json(state.gallery.list().await?))
}

/// # Request Body
///
/// ```json
/// { "title": "Bridal updo", "imageUrl": "https://...", "category": "Hair" }
/// ```
///
/// Returns 201 Created with the stored item.
pub async fn create_gallery_item(
    State(state): State<AppState>,
    payload: Result<Json<NewGalleryItem>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(item) = payload?;
    let item = content_service::add_gallery_item(state.gallery.as_ref(), item).await?;

    Ok((StatusCode::CREATED, Json(item)))
}

/// Returns 204 No Content whether or not the item existed.
pub async fn delete_gallery_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if let Ok(id) = Uuid::parse_str(&id) {
        state.gallery.delete_by_id(id).await?;
    }

    Ok(StatusCode::NO_CONTENT)
}
