//! HTTP middleware components.
//!
//! Middleware and extractors that run before route handlers:
//! - Authenticate requests from the session cookie
//! - Work out the public origin of a request

/// Session cookie authentication middleware
pub mod auth;
/// Public origin extractor
pub mod origin;
