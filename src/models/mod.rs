//! Data models representing database entities.
//!
//! This module contains all data structures that map to database tables,
//! plus the request/response bodies built from them.

/// Admin principal and login types
pub mod admin_user;
/// Issued certificates
pub mod certificate;
/// Contact-form submissions
pub mod contact;
/// Gallery items
pub mod gallery;
/// Server-side login sessions
pub mod session;
