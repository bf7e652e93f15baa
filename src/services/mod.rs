//! Business logic services.
//!
//! Services contain core logic separated from HTTP handlers. They talk to
//! storage only through the traits in [`crate::store`].

pub mod auth_service;
pub mod certificate_service;
pub mod content_service;
pub mod password;
pub mod seed;
