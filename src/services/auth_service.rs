//! Session-based admin authentication.
//!
//! A caller is either anonymous or bound to a live admin through a session.
//! Sessions are looked up by the SHA-256 of an opaque random token; the raw
//! token is only ever handed to the cookie layer.
//!
//! # Flow
//!
//! 1. `login` checks the credential and stores a new session with a fixed expiry
//! 2. `current_user` resolves a token to `{id, username}` or nothing
//! 3. `require_authenticated` turns "nothing" into 401 for privileged routes
//! 4. `logout` deletes the session server-side

use std::sync::Arc;

use chrono::{Duration, Utc};
use sha2::{Digest, Sha256};

use crate::error::AppError;
use crate::models::{admin_user::CurrentUser, session::Session};
use crate::services::password::PasswordService;
use crate::store::{CredentialStore, SessionStore};

/// The authentication gate shared by the login endpoints and the admin middleware.
#[derive(Clone)]
pub struct AuthGate {
    credentials: Arc<dyn CredentialStore>,
    sessions: Arc<dyn SessionStore>,
    passwords: PasswordService,
    ttl: Duration,
}

impl AuthGate {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        sessions: Arc<dyn SessionStore>,
        passwords: PasswordService,
        ttl: Duration,
    ) -> Self {
        Self {
            credentials,
            sessions,
            passwords,
            ttl,
        }
    }

    /// Check a username/password pair and open a session.
    ///
    /// Returns the raw session token. An unknown username and a wrong
    /// password fail identically with [`AppError::InvalidCredentials`].
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AppError> {
        let Some(admin) = self.credentials.find_by_username(username).await? else {
            // Same key-derivation cost as a wrong password
            self.passwords
                .verify_decoy_blocking(password.to_string())
                .await?;
            tracing::warn!(username, "login rejected");
            return Err(AppError::InvalidCredentials);
        };

        let valid = self
            .passwords
            .verify_blocking(password.to_string(), admin.password_hash.clone())
            .await?;
        if !valid {
            tracing::warn!(username, "login rejected");
            return Err(AppError::InvalidCredentials);
        }

        let token = generate_token();
        let now = Utc::now();
        self.sessions
            .insert(Session {
                token_hash: hash_token(&token),
                admin_user_id: admin.id,
                expires_at: now + self.ttl,
                created_at: now,
            })
            .await?;

        tracing::info!(username, admin_id = %admin.id, "admin logged in");
        Ok(token)
    }

    /// Destroy the session behind `token`, if any.
    pub async fn logout(&self, token: Option<&str>) -> Result<(), AppError> {
        if let Some(token) = token {
            self.sessions.delete(&hash_token(token)).await?;
            tracing::info!("admin logged out");
        }
        Ok(())
    }

    /// Resolve a session token to the admin it belongs to.
    ///
    /// A missing, expired or unknown token yields `None`, as does a session
    /// whose admin has since been deleted; such orphaned sessions are removed.
    pub async fn current_user(&self, token: Option<&str>) -> Result<Option<CurrentUser>, AppError> {
        let Some(token) = token else {
            return Ok(None);
        };
        let token_hash = hash_token(token);

        let Some(session) = self.sessions.find(&token_hash, Utc::now()).await? else {
            return Ok(None);
        };

        match self.credentials.find_by_id(session.admin_user_id).await? {
            Some(admin) => Ok(Some(admin.into())),
            None => {
                self.sessions.delete(&token_hash).await?;
                Ok(None)
            }
        }
    }

    /// Like [`Self::current_user`], but anonymous callers get [`AppError::Unauthorized`].
    pub async fn require_authenticated(&self, token: Option<&str>) -> Result<CurrentUser, AppError> {
        self.current_user(token)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Remove expired sessions from the backing store.
    pub async fn purge_expired(&self) -> Result<u64, AppError> {
        self.sessions.purge_expired(Utc::now()).await
    }
}

/// Generate a random session token (64 hex characters).
fn generate_token() -> String {
    let bytes: [u8; 32] = rand::random();
    hex::encode(bytes)
}

/// Hash a token for storage, so a leaked session table cannot be replayed.
fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemorySessionStore, memory::MemoryStore};

    async fn gate() -> (AuthGate, Arc<MemoryStore>, Arc<MemorySessionStore>) {
        let store = Arc::new(MemoryStore::new());
        let sessions = Arc::new(MemorySessionStore::new());
        let passwords = PasswordService::for_tests();
        let hash = passwords.hash("correct horse").unwrap();
        store.create("owner", &hash).await.unwrap();

        let gate = AuthGate::new(
            store.clone(),
            sessions.clone(),
            passwords,
            Duration::hours(24),
        );
        (gate, store, sessions)
    }

    #[tokio::test]
    async fn login_opens_a_session() {
        let (gate, _, sessions) = gate().await;
        let token = gate.login("owner", "correct horse").await.unwrap();
        assert_eq!(token.len(), 64);
        assert_eq!(sessions.len(), 1);

        let user = gate.current_user(Some(&token)).await.unwrap().unwrap();
        assert_eq!(user.username, "owner");
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_fail_alike() {
        let (gate, _, sessions) = gate().await;
        let wrong_password = gate.login("owner", "nope").await.unwrap_err();
        let unknown_user = gate.login("nobody", "correct horse").await.unwrap_err();

        assert!(matches!(wrong_password, AppError::InvalidCredentials));
        assert!(matches!(unknown_user, AppError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
        assert_eq!(sessions.len(), 0);
    }

    #[tokio::test]
    async fn unknown_user_pays_for_a_derivation() {
        let store = Arc::new(MemoryStore::new());
        let passwords = PasswordService::for_tests();
        store
            .create("owner", &passwords.hash("correct horse").unwrap())
            .await
            .unwrap();
        let gate = AuthGate::new(
            store,
            Arc::new(MemorySessionStore::new()),
            passwords.clone(),
            Duration::hours(24),
        );

        gate.login("owner", "nope").await.unwrap_err();
        assert_eq!(passwords.derivations(), 1);

        gate.login("nobody", "nope").await.unwrap_err();
        assert_eq!(passwords.derivations(), 2);
    }

    #[tokio::test]
    async fn usernames_are_case_sensitive() {
        let (gate, _, _) = gate().await;
        assert!(matches!(
            gate.login("Owner", "correct horse").await,
            Err(AppError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn logout_invalidates_the_token() {
        let (gate, _, _) = gate().await;
        let token = gate.login("owner", "correct horse").await.unwrap();
        gate.logout(Some(&token)).await.unwrap();

        assert_eq!(gate.current_user(Some(&token)).await.unwrap(), None);
        assert!(matches!(
            gate.require_authenticated(Some(&token)).await,
            Err(AppError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn logout_without_session_succeeds() {
        let (gate, _, _) = gate().await;
        gate.logout(None).await.unwrap();
        gate.logout(Some("not-a-token")).await.unwrap();
    }

    #[tokio::test]
    async fn deleted_admin_orphans_the_session() {
        let (gate, store, sessions) = gate().await;
        let token = gate.login("owner", "correct horse").await.unwrap();
        let admin = store.find_by_username("owner").await.unwrap().unwrap();
        store.delete_by_id(admin.id).await.unwrap();

        assert_eq!(gate.current_user(Some(&token)).await.unwrap(), None);
        assert_eq!(sessions.len(), 0);
    }

    #[tokio::test]
    async fn expired_session_is_anonymous() {
        let store = Arc::new(MemoryStore::new());
        let passwords = PasswordService::for_tests();
        store
            .create("owner", &passwords.hash("pw").unwrap())
            .await
            .unwrap();
        let gate = AuthGate::new(
            store,
            Arc::new(MemorySessionStore::new()),
            passwords,
            Duration::zero(),
        );

        let token = gate.login("owner", "pw").await.unwrap();
        assert_eq!(gate.current_user(Some(&token)).await.unwrap(), None);
        assert_eq!(gate.purge_expired().await.unwrap(), 0);
    }

    #[test]
    fn token_hash_is_stable_hex() {
        let hash = hash_token("abc");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, hash_token("abc"));
        assert_ne!(hash, hash_token("abd"));
    }
}
