//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use anyhow::bail;
use axum_extra::extract::cookie::SameSite;
use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (required): PostgreSQL connection string
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
/// - `SESSION_SECRET` (required): key used to sign session cookies
/// - `SESSION_TTL_HOURS` (optional): absolute session lifetime, defaults to 24
/// - `SESSION_STORE` (optional): `memory` or `postgres`, defaults to `memory`
/// - `SESSION_PURGE_INTERVAL_SECS` (optional): expired-session sweep period, defaults to 3600
/// - `COOKIE_SECURE` (optional): mark the session cookie `Secure`, defaults to false
/// - `COOKIE_SAME_SITE` (optional): `lax`, `strict` or `none`, defaults to `lax`
/// - `CORS_ALLOWED_ORIGIN` (optional): origin allowed to make credentialed requests
/// - `PUBLIC_BASE_URL` (optional): origin embedded in certificate verification links
/// - `TRUST_PROXY` (optional): honour `X-Forwarded-*` headers, defaults to false
/// - `ADMIN_USERNAME` / `ADMIN_PASSWORD` (required): the canonical admin credential
/// - `LEGACY_ADMIN_USERNAME` (optional): superseded admin to retire, defaults to `admin`
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    pub session_secret: String,

    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: i64,

    #[serde(default = "default_session_store")]
    pub session_store: String,

    #[serde(default = "default_purge_interval")]
    pub session_purge_interval_secs: u64,

    #[serde(default)]
    pub cookie_secure: bool,

    #[serde(default = "default_same_site")]
    pub cookie_same_site: String,

    pub cors_allowed_origin: Option<String>,

    pub public_base_url: Option<String>,

    #[serde(default)]
    pub trust_proxy: bool,

    pub admin_username: String,

    pub admin_password: String,

    #[serde(default = "default_legacy_admin")]
    pub legacy_admin_username: String,
}

/// Where login sessions are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionBackend {
    /// Process-local map; sessions are lost on restart.
    Memory,
    /// `admin_sessions` table, shared by every process using the database.
    Postgres,
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    3000
}

fn default_session_ttl_hours() -> i64 {
    24
}

fn default_session_store() -> String {
    "memory".to_string()
}

fn default_purge_interval() -> u64 {
    3600
}

fn default_same_site() -> String {
    "lax".to_string()
}

fn default_legacy_admin() -> String {
    "admin".to_string()
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing (e.g., DATABASE_URL)
    /// - Environment variable values cannot be parsed into expected types
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        // Field names are automatically converted: database_url -> DATABASE_URL
        envy::from_env::<Config>()
    }

    /// Parse `SESSION_STORE`.
    pub fn session_backend(&self) -> anyhow::Result<SessionBackend> {
        match self.session_store.to_ascii_lowercase().as_str() {
            "memory" => Ok(SessionBackend::Memory),
            "postgres" => Ok(SessionBackend::Postgres),
            other => bail!("SESSION_STORE must be `memory` or `postgres`, got `{other}`"),
        }
    }

    /// Parse `COOKIE_SAME_SITE`.
    ///
    /// Browsers drop `SameSite=None` cookies that are not also `Secure`, so that
    /// combination is rejected at startup.
    pub fn same_site(&self) -> anyhow::Result<SameSite> {
        let same_site = match self.cookie_same_site.to_ascii_lowercase().as_str() {
            "lax" => SameSite::Lax,
            "strict" => SameSite::Strict,
            "none" => SameSite::None,
            other => bail!("COOKIE_SAME_SITE must be `lax`, `strict` or `none`, got `{other}`"),
        };
        if same_site == SameSite::None && !self.cookie_secure {
            bail!("COOKIE_SAME_SITE=none requires COOKIE_SECURE=true");
        }
        Ok(same_site)
    }

    /// Validate `SESSION_TTL_HOURS` and turn it into a duration.
    pub fn session_ttl(&self) -> anyhow::Result<chrono::Duration> {
        if self.session_ttl_hours <= 0 {
            bail!("SESSION_TTL_HOURS must be positive");
        }
        Ok(chrono::Duration::hours(self.session_ttl_hours))
    }

    /// Key for signing session cookies; must not be blank.
    pub fn session_secret(&self) -> anyhow::Result<&[u8]> {
        if self.session_secret.trim().is_empty() {
            bail!("SESSION_SECRET must not be empty");
        }
        Ok(self.session_secret.as_bytes())
    }

    /// Validate `PUBLIC_BASE_URL`, returning it without a trailing slash.
    pub fn public_base_url(&self) -> anyhow::Result<Option<String>> {
        let Some(raw) = &self.public_base_url else {
            return Ok(None);
        };
        let parsed = url::Url::parse(raw)
            .map_err(|e| anyhow::anyhow!("PUBLIC_BASE_URL is not a valid URL: {e}"))?;
        if !matches!(parsed.scheme(), "http" | "https") || !parsed.has_host() {
            bail!("PUBLIC_BASE_URL must be an http(s) origin, got `{raw}`");
        }
        Ok(Some(raw.trim_end_matches('/').to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            database_url: "postgres://localhost/salon".to_string(),
            server_port: default_port(),
            session_secret: "secret".to_string(),
            session_ttl_hours: default_session_ttl_hours(),
            session_store: default_session_store(),
            session_purge_interval_secs: default_purge_interval(),
            cookie_secure: false,
            cookie_same_site: default_same_site(),
            cors_allowed_origin: None,
            public_base_url: None,
            trust_proxy: false,
            admin_username: "owner".to_string(),
            admin_password: "owner-password".to_string(),
            legacy_admin_username: default_legacy_admin(),
        }
    }

    #[test]
    fn defaults_parse() {
        let config = config();
        assert_eq!(config.session_backend().unwrap(), SessionBackend::Memory);
        assert_eq!(config.same_site().unwrap(), SameSite::Lax);
        assert_eq!(config.session_ttl().unwrap(), chrono::Duration::hours(24));
    }

    #[test]
    fn session_backend_is_case_insensitive() {
        let mut config = config();
        config.session_store = "Postgres".to_string();
        assert_eq!(config.session_backend().unwrap(), SessionBackend::Postgres);
        config.session_store = "redis".to_string();
        assert!(config.session_backend().is_err());
    }

    #[test]
    fn same_site_none_needs_secure() {
        let mut config = config();
        config.cookie_same_site = "none".to_string();
        assert!(config.same_site().is_err());
        config.cookie_secure = true;
        assert_eq!(config.same_site().unwrap(), SameSite::None);
    }

    #[test]
    fn non_positive_ttl_is_rejected() {
        let mut config = config();
        config.session_ttl_hours = 0;
        assert!(config.session_ttl().is_err());
    }

    #[test]
    fn blank_session_secret_is_rejected() {
        let mut config = config();
        assert_eq!(config.session_secret().unwrap(), b"secret");
        config.session_secret = String::new();
        assert!(config.session_secret().is_err());
        config.session_secret = "   ".to_string();
        assert!(config.session_secret().is_err());
    }

    #[test]
    fn public_base_url_is_checked() {
        let mut config = config();
        assert_eq!(config.public_base_url().unwrap(), None);

        config.public_base_url = Some("https://salon.example/".to_string());
        assert_eq!(
            config.public_base_url().unwrap().as_deref(),
            Some("https://salon.example")
        );

        config.public_base_url = Some("ftp://salon.example".to_string());
        assert!(config.public_base_url().is_err());
        config.public_base_url = Some("not a url".to_string());
        assert!(config.public_base_url().is_err());
    }
}
