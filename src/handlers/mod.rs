//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, cookies)
//! 2. Calls a service or store
//! 3. Returns HTTP response (JSON, status code)

/// Login, logout and current user
pub mod auth;
/// Certificate issuance and verification
pub mod certificates;
/// Contact-form messages
pub mod contact;
/// Gallery items
pub mod gallery;
/// Liveness probe
pub mod health;
