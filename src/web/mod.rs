//! Web API module for blogd.
//!
//! This module provides the REST API: registration and login, public post
//! reads, and admin-only post writes.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::create_router;
pub use server::{shutdown_signal, WebServer};
