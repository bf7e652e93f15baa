//! Gallery ("our work") items shown on the public site.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// # Database Table
///
/// Maps to the `gallery_items` table. `image_url` is an opaque string; this
/// service never fetches or hosts images.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItem {
    pub id: Uuid,
    pub title: String,
    pub image_url: String,
    /// Free-form grouping such as "Hair", "Nails" or "Makeup"
    pub category: String,
    pub created_at: DateTime<Utc>,
}

/// Request body for `POST /api/gallery`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGalleryItem {
    pub title: String,
    pub image_url: String,
    pub category: String,
}
