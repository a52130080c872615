//! Middleware for Web API.

pub mod auth;

pub use auth::{parse_bearer, require_admin, AuthSubject};
