//! Admin login/logout HTTP handlers.
//!
//! - POST /api/login - Check credentials and set the session cookie
//! - POST /api/logout - Destroy the session and clear the cookie
//! - GET /api/user - Who is logged in (or `null`)

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use axum_extra::extract::CookieJar;

use crate::{
    error::AppError,
    models::admin_user::{CurrentUser, LoginRequest, MessageResponse},
    routes::AppState,
};

/// Log in as the admin.
///
/// # Request Body
///
/// ```json
/// { "username": "owner", "password": "..." }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: `{ "message": "Logged in successfully" }` plus `Set-Cookie`
/// - **Error (401)**: `Invalid credentials`, whichever of the two was wrong
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<MessageResponse>), AppError> {
    let Json(request) = payload?;
    let token = state
        .auth
        .login(&request.username, &request.password)
        .await?;

    Ok((
        jar.add(state.cookies.issue(&token)),
        Json(MessageResponse::new("Logged in successfully")),
    ))
}

/// Log out.
///
/// Always 200, with or without a session; the cookie is cleared either way.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<MessageResponse>), AppError> {
    let token = state.cookies.token_from(&jar);
    state.auth.logout(token.as_deref()).await?;

    Ok((
        jar.remove(state.cookies.removal()),
        Json(MessageResponse::new("Logged out")),
    ))
}

/// Current admin.
///
/// # Response (200 OK)
///
/// `{ "id": "...", "username": "owner" }` when logged in, `null` otherwise.
pub async fn current_user(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<Option<CurrentUser>>, AppError> {
    let token = state.cookies.token_from(&jar);
    let user = state.auth.current_user(token.as_deref()).await?;

    Ok(Json(user))
}
