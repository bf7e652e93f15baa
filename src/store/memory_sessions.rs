//! Process-local session backend.
//!
//! Sessions disappear on restart and are not shared between processes; use
//! the Postgres backend when running more than one instance.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use super::SessionStore;
use crate::error::AppError;
use crate::models::session::Session;

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: DashMap<String, Session>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn insert(&self, session: Session) -> Result<(), AppError> {
        self.sessions.insert(session.token_hash.clone(), session);
        Ok(())
    }

    async fn find(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Session>, AppError> {
        // Expired entries are evicted on read as well as by the purge task.
        let removed = self
            .sessions
            .remove_if(token_hash, |_, session| session.is_expired(now));
        if removed.is_some() {
            return Ok(None);
        }
        Ok(self.sessions.get(token_hash).map(|entry| entry.value().clone()))
    }

    async fn delete(&self, token_hash: &str) -> Result<(), AppError> {
        self.sessions.remove(token_hash);
        Ok(())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| !session.is_expired(now));
        Ok(before.saturating_sub(self.sessions.len()) as u64)
    }
}
