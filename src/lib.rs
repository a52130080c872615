//! blogd - a small blog backend.
//!
//! Accounts register and log in with email and password and receive a
//! self-issued HS256 session token. Anyone may read posts; creating,
//! editing and deleting posts requires a token whose subject is an
//! admin at the moment of the request.

pub mod auth;
pub mod blog;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod web;

pub use auth::{
    AccessValidator, AuthError, BcryptHasher, Credentials, Registrar, Registration, SigningKey,
    TokenIssuer, UserDirectory,
};
pub use blog::{NewPost, Post, PostFilter, PostRepository, PostUpdate};
pub use config::Config;
pub use db::{Database, NewUser, User, UserRepository};
pub use error::{BlogError, Result};
pub use web::{create_router, AppState, WebServer};
