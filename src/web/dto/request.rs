//! Request DTOs for Web API.

use serde::Deserialize;
use validator::Validate;

use super::validation::{not_empty_trimmed, password_rules, title_rules};
use crate::auth::{Credentials, Registration};
use crate::blog::{PostFilter, PostUpdate};

/// Login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email.
    #[validate(email(message = "Must be a valid email address"))]
    pub email: String,
    /// Password.
    #[validate(custom(function = "password_rules"))]
    pub password: String,
}

impl From<LoginRequest> for Credentials {
    fn from(req: LoginRequest) -> Self {
        Credentials::new(req.email, req.password)
    }
}

/// User registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email.
    #[validate(email(message = "Must be a valid email address"))]
    pub email: String,
    /// Password.
    #[validate(custom(function = "password_rules"))]
    pub password: String,
    /// Request the administrator role.
    #[serde(default)]
    pub is_admin: bool,
}

impl From<RegisterRequest> for Registration {
    fn from(req: RegisterRequest) -> Self {
        Registration::new(req.email, req.password).with_admin(req.is_admin)
    }
}

/// Create post request.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    /// Post title.
    #[validate(
        length(max = 200, message = "Title must be at most 200 characters"),
        custom(function = "title_rules")
    )]
    pub title: String,
    /// Post body.
    #[validate(custom(function = "not_empty_trimmed"))]
    pub content: String,
}

/// Update post request.
///
/// Replaces title and content; author and creation time are kept.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePostRequest {
    /// Post title.
    #[validate(
        length(max = 200, message = "Title must be at most 200 characters"),
        custom(function = "title_rules")
    )]
    pub title: String,
    /// Post body.
    #[validate(custom(function = "not_empty_trimmed"))]
    pub content: String,
}

impl From<UpdatePostRequest> for PostUpdate {
    fn from(req: UpdatePostRequest) -> Self {
        PostUpdate::new().title(req.title).content(req.content)
    }
}

/// Post listing query.
#[derive(Debug, Default, Deserialize)]
pub struct ListPostsQuery {
    /// Only posts whose title or content contains this text.
    pub contains: Option<String>,
    /// Maximum number of posts.
    pub limit: Option<u32>,
}

impl From<ListPostsQuery> for PostFilter {
    fn from(query: ListPostsQuery) -> Self {
        PostFilter {
            contains: query.contains.filter(|c| !c.is_empty()),
            limit: query.limit,
        }
    }
}
