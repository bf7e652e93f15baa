//! Startup seeding of the admin principal.
//!
//! There is exactly one canonical admin, configured by the operator. The
//! routine is split into a pure [`plan`] over the current store state and
//! [`run`], which reads that state and applies the plan, so it can be
//! re-run on every boot.

use uuid::Uuid;

use crate::error::AppError;
use crate::models::admin_user::AdminUser;
use crate::services::password::PasswordService;
use crate::store::CredentialStore;

/// Desired admin state.
#[derive(Clone)]
pub struct AdminSeed {
    pub username: String,
    pub password: String,
    /// Username of a superseded admin to remove, if it still exists.
    pub legacy_username: Option<String>,
}

/// A write needed to reach the desired state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedAction {
    RetireLegacy { id: Uuid, username: String },
    CreateCanonical,
}

/// Decide which writes bring the store in line with `seed`.
///
/// An existing canonical admin is left untouched, password included. A legacy
/// username equal to the canonical one is ignored.
pub fn plan(
    seed: &AdminSeed,
    legacy: Option<&AdminUser>,
    canonical: Option<&AdminUser>,
) -> Vec<SeedAction> {
    let mut actions = Vec::new();

    if let Some(legacy) = legacy {
        if legacy.username != seed.username {
            actions.push(SeedAction::RetireLegacy {
                id: legacy.id,
                username: legacy.username.clone(),
            });
        }
    }

    if canonical.is_none() {
        actions.push(SeedAction::CreateCanonical);
    }

    actions
}

/// Bring the credential store in line with `seed`. Returns the applied actions.
pub async fn run(
    seed: &AdminSeed,
    store: &dyn CredentialStore,
    passwords: &PasswordService,
) -> Result<Vec<SeedAction>, AppError> {
    let legacy = match &seed.legacy_username {
        Some(username) => store.find_by_username(username).await?,
        None => None,
    };
    let canonical = store.find_by_username(&seed.username).await?;

    let actions = plan(seed, legacy.as_ref(), canonical.as_ref());
    for action in &actions {
        match action {
            SeedAction::RetireLegacy { id, username } => {
                store.delete_by_id(*id).await?;
                tracing::info!(username = %username, "legacy admin removed");
            }
            SeedAction::CreateCanonical => {
                let hash = passwords.hash_blocking(seed.password.clone()).await?;
                store.create(&seed.username, &hash).await?;
                tracing::info!(username = %seed.username, "admin created");
            }
        }
    }

    if actions.is_empty() {
        tracing::debug!(username = %seed.username, "admin already seeded");
    }
    Ok(actions)
}
