//! Router construction and shared handler state.

use std::sync::Arc;

use axum::{
    Router, middleware as axum_middleware,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;

use crate::{
    handlers,
    middleware::{self, auth::SessionCookies, origin::OriginPolicy},
    services::auth_service::AuthGate,
    store::{CertificateStore, ContactStore, GalleryStore},
};

/// State shared with every handler via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthGate,
    pub cookies: SessionCookies,
    pub origin: OriginPolicy,
    pub certificates: Arc<dyn CertificateStore>,
    pub gallery: Arc<dyn GalleryStore>,
    pub contact: Arc<dyn ContactStore>,
}

/// Build the HTTP router.
///
/// Privileged routes sit behind [`middleware::auth::require_admin`]; they
/// share paths with public routes, so the two groups are merged per method.
pub fn build_router(state: AppState) -> Router {
    let admin_routes = Router::new()
        .route(
            "/api/certificates",
            post(handlers::certificates::create_certificate),
        )
        .route(
            "/api/certificates/{id}",
            delete(handlers::certificates::delete_certificate),
        )
        .route("/api/gallery", post(handlers::gallery::create_gallery_item))
        .route(
            "/api/gallery/{id}",
            delete(handlers::gallery::delete_gallery_item),
        )
        .route("/api/contact", get(handlers::contact::list_messages))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_admin,
        ));

    Router::new()
        // Session
        .route("/api/login", post(handlers::auth::login))
        .route("/api/logout", post(handlers::auth::logout))
        .route("/api/user", get(handlers::auth::current_user))
        // Public certificate lookups
        .route(
            "/api/certificates",
            get(handlers::certificates::list_certificates),
        )
        .route(
            "/api/certificates/{id}",
            get(handlers::certificates::get_certificate),
        )
        .route(
            "/api/certificates/verify/{number}",
            get(handlers::certificates::verify_certificate),
        )
        // Site content
        .route("/api/gallery", get(handlers::gallery::list_gallery))
        .route("/api/contact", post(handlers::contact::submit_message))
        .route("/api/health", get(handlers::health::health_check))
        .merge(admin_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
