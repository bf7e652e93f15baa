//! Session cookie authentication middleware.
//!
//! This middleware intercepts every privileged request to:
//! 1. Read the session cookie and check its HMAC signature
//! 2. Resolve the session to a live admin
//! 3. Inject authentication context into the request
//! 4. Reject anonymous requests with HTTP 401

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

use crate::{error::AppError, routes::AppState};

type HmacSha256 = Hmac<Sha256>;

/// Name of the cookie carrying the signed session token.
pub const SESSION_COOKIE: &str = "salon_session";

/// Authentication context attached to authenticated requests.
///
/// Inserted into the request's extension map by [`require_admin`] and
/// extracted by handlers with `Extension<AuthContext>`.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub admin_user_id: Uuid,
    pub username: String,
}

/// Issues, reads and clears the session cookie.
///
/// # Cookie Format
///
/// `<token>.<hex hmac-sha256(secret, token)>`
///
/// A cookie whose signature does not verify is treated as absent, so forged
/// or truncated values never reach the session store.
#[derive(Clone)]
pub struct SessionCookies {
    secret: Arc<[u8]>,
    secure: bool,
    same_site: SameSite,
    ttl: chrono::Duration,
}

impl SessionCookies {
    pub fn new(secret: &[u8], secure: bool, same_site: SameSite, ttl: chrono::Duration) -> Self {
        Self {
            secret: Arc::from(secret),
            secure,
            same_site,
            ttl,
        }
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(&self.secret).expect("HMAC key length is valid")
    }

    fn sign(&self, token: &str) -> String {
        let mut mac = self.mac();
        mac.update(token.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Build the `Set-Cookie` for a freshly issued session token.
    ///
    /// `Max-Age` is the absolute session lifetime; it is never refreshed.
    pub fn issue(&self, token: &str) -> Cookie<'static> {
        let value = format!("{token}.{}", self.sign(token));
        Cookie::build((SESSION_COOKIE, value))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(self.same_site)
            .max_age(time::Duration::seconds(self.ttl.num_seconds()))
            .build()
    }

    /// Cookie that, once added to a jar, makes the browser drop the session.
    pub fn removal(&self) -> Cookie<'static> {
        Cookie::build(SESSION_COOKIE)
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(self.same_site)
            .build()
    }

    /// Extract the session token if the cookie is present and correctly signed.
    pub fn token_from(&self, jar: &CookieJar) -> Option<String> {
        let cookie = jar.get(SESSION_COOKIE)?;
        let (token, signature) = cookie.value().rsplit_once('.')?;
        let signature = hex::decode(signature).ok()?;

        let mut mac = self.mac();
        mac.update(token.as_bytes());
        // Constant-time comparison
        mac.verify_slice(&signature).ok()?;

        Some(token.to_string())
    }
}

/// Admin authentication middleware function.
///
/// # Flow
///
/// 1. Read and verify the `salon_session` cookie
/// 2. Look up the session and its admin
/// 3. If found: inject `AuthContext` into request, call next handler
/// 4. If not found: return 401 Unauthorized error
///
/// # Returns
///
/// - `Ok(Response)` if authenticated successfully (calls next handler)
/// - `Err(AppError::Unauthorized)` otherwise; the handler never runs
pub async fn require_admin(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = state.cookies.token_from(&jar);
    let admin = state.auth.require_authenticated(token.as_deref()).await?;

    request.extensions_mut().insert(AuthContext {
        admin_user_id: admin.id,
        username: admin.username,
    });

    Ok(next.run(request).await)
}
