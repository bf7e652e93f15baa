//! Gallery and contact-form submissions.
//!
//! Both are plain inserts after a non-empty check; contact messages are only
//! stored, never forwarded anywhere.

use crate::error::AppError;
use crate::models::{
    contact::{ContactMessage, NewContactMessage},
    gallery::{GalleryItem, NewGalleryItem},
};
use crate::store::{ContactStore, GalleryStore};

fn require_non_empty(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(
            field,
            format!("{field} must not be empty"),
        ));
    }
    Ok(())
}

/// Add a picture to the public gallery.
pub async fn add_gallery_item(
    store: &dyn GalleryStore,
    item: NewGalleryItem,
) -> Result<GalleryItem, AppError> {
    require_non_empty("title", &item.title)?;
    require_non_empty("imageUrl", &item.image_url)?;
    require_non_empty("category", &item.category)?;

    let item = store.insert(item).await?;
    tracing::info!(gallery_item_id = %item.id, category = %item.category, "gallery item added");
    Ok(item)
}

/// Store a contact-form message.
pub async fn submit_contact_message(
    store: &dyn ContactStore,
    message: NewContactMessage,
) -> Result<ContactMessage, AppError> {
    require_non_empty("name", &message.name)?;
    require_non_empty("email", &message.email)?;
    if !message.email.contains('@') {
        return Err(AppError::validation("email", "email must be an email address"));
    }
    require_non_empty("message", &message.message)?;

    let message = store.insert(message).await?;
    tracing::info!(contact_message_id = %message.id, "contact message received");
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    #[tokio::test]
    async fn gallery_requires_all_fields() {
        let store = MemoryStore::new();
        let err = add_gallery_item(
            &store,
            NewGalleryItem {
                title: "Bridal updo".to_string(),
                image_url: " ".to_string(),
                category: "Hair".to_string(),
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            AppError::Validation { field: Some(ref f), .. } if f == "imageUrl"
        ));
        assert!(GalleryStore::list(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn contact_message_is_stored() {
        let store = MemoryStore::new();
        let stored = submit_contact_message(
            &store,
            NewContactMessage {
                name: "Ama".to_string(),
                email: "ama@example.com".to_string(),
                message: "Do you do bridal makeup?".to_string(),
            },
        )
        .await
        .unwrap();

        assert_eq!(ContactStore::list(&store).await.unwrap(), vec![stored]);
    }

    #[tokio::test]
    async fn contact_email_needs_an_at_sign() {
        let store = MemoryStore::new();
        let err = submit_contact_message(
            &store,
            NewContactMessage {
                name: "Ama".to_string(),
                email: "ama.example.com".to_string(),
                message: "Hello".to_string(),
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            AppError::Validation { field: Some(ref f), .. } if f == "email"
        ));
    }
}
