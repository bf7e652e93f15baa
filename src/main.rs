//! Salon Certificate Server - Main Application Entry Point
//!
//! REST back-end for a beauty salon: administrators issue course completion
//! certificates, and anyone holding a certificate number (typically from the
//! QR code printed on it) can verify it.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries)
//! - **Authentication**: Argon2id passwords, HMAC-signed session cookies
//! - **Format**: JSON requests/responses
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool
//! 3. Run database migrations
//! 4. Seed the admin account
//! 5. Build HTTP router with routes and middleware
//! 6. Start server on configured port

mod config;
mod db;
mod error;
mod handlers;
mod middleware;
mod models;
mod routes;
mod services;
mod store;

use std::{sync::Arc, time::Duration};

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

use crate::{
    config::SessionBackend,
    middleware::{auth::SessionCookies, origin::OriginPolicy},
    routes::AppState,
    services::{
        auth_service::AuthGate,
        password::PasswordService,
        seed::{self, AdminSeed},
    },
    store::{MemorySessionStore, PgStore, SessionStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration
    let config = config::Config::from_env()?;
    let session_backend = config.session_backend()?;
    let same_site = config.same_site()?;
    let session_ttl = config.session_ttl()?;
    let session_secret = config.session_secret()?;
    let public_base_url = config.public_base_url()?;
    tracing::info!("Configuration loaded");

    // Create database pool
    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    // Run migrations
    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    let store = Arc::new(PgStore::new(pool));
    let sessions: Arc<dyn SessionStore> = match session_backend {
        SessionBackend::Memory => Arc::new(MemorySessionStore::new()) as Arc<dyn SessionStore>,
        SessionBackend::Postgres => store.clone() as Arc<dyn SessionStore>,
    };
    tracing::info!(backend = ?session_backend, "Session store ready");

    // Seed the admin before accepting logins
    let passwords = PasswordService::default();
    let admin_seed = AdminSeed {
        username: config.admin_username.clone(),
        password: config.admin_password.clone(),
        legacy_username: Some(config.legacy_admin_username.clone()),
    };
    seed::run(&admin_seed, store.as_ref(), &passwords).await?;

    let auth = AuthGate::new(store.clone(), sessions, passwords, session_ttl);
    spawn_session_purge(auth.clone(), config.session_purge_interval_secs);

    let state = AppState {
        auth,
        cookies: SessionCookies::new(
            session_secret,
            config.cookie_secure,
            same_site,
            session_ttl,
        ),
        origin: OriginPolicy {
            public_base_url,
            trust_proxy: config.trust_proxy,
        },
        certificates: store.clone(),
        gallery: store.clone(),
        contact: store,
    };

    let mut app = routes::build_router(state);

    // Browsers only send the session cookie cross-origin to an explicitly allowed origin
    if let Some(origin) = &config.cors_allowed_origin {
        let cors = CorsLayer::new()
            .allow_origin(HeaderValue::from_str(origin)?)
            .allow_methods([Method::GET, Method::POST, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true);
        app = app.layer(cors);
        tracing::info!(origin = %origin, "CORS enabled");
    }

    // Bind to network address and start server
    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Start serving HTTP requests
    axum::serve(listener, app).await?;

    Ok(())
}

/// Periodically drop expired sessions so the store does not grow unbounded.
fn spawn_session_purge(auth: AuthGate, interval_secs: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
        // The first tick completes immediately
        interval.tick().await;

        loop {
            interval.tick().await;
            match auth.purge_expired().await {
                Ok(0) => {}
                Ok(purged) => tracing::info!(purged, "Expired sessions purged"),
                Err(e) => tracing::warn!(error = %e, "Session purge failed"),
            }
        }
    });
}
