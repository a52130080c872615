//! Bearer token authentication middleware.

use axum::{
    async_trait,
    body::Body,
    extract::{FromRequestParts, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::auth::AuthError;
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// A missing or empty header is `MissingCredentials`; anything that is not
/// exactly two space-separated parts starting with `Bearer` is
/// `MalformedCredentials`.
pub fn parse_bearer(header: Option<&HeaderValue>) -> Result<&str, AuthError> {
    let value = match header {
        None => return Err(AuthError::MissingCredentials),
        Some(v) if v.is_empty() => return Err(AuthError::MissingCredentials),
        Some(v) => v.to_str().map_err(|_| AuthError::MalformedCredentials)?,
    };

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::MalformedCredentials),
    }
}

/// Subject id of the admin that passed [`require_admin`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSubject(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for AuthSubject
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<AuthSubject>().cloned().ok_or_else(|| {
            tracing::error!("AuthSubject requested on a route without require_admin");
            ApiError::internal("subject not set in request context")
        })
    }
}

/// Middleware admitting only requests that carry a valid admin token.
///
/// On success the subject id is stored in the request extensions as
/// [`AuthSubject`].
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = parse_bearer(request.headers().get(AUTHORIZATION))
        .map_err(|e| {
            tracing::debug!("rejected authorization header: {}", e);
            ApiError::from(e)
        })?
        .to_string();

    let subject = match state.validator.validate(&token).await {
        Ok(subject) => subject,
        Err(e) => {
            tracing::warn!(
                method = %request.method(),
                path = %request.uri().path(),
                "access refused: {}",
                e
            );
            return Err(ApiError::from(e));
        }
    };

    tracing::debug!(subject = %subject, "admin access granted");
    request.extensions_mut().insert(AuthSubject(subject));
    Ok(next.run(request).await)
}
