//! Authentication handlers.

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::auth::{
    AccessValidator, BcryptHasher, CredentialHasher, Registrar, SigningKey, TokenIssuer,
    UserDirectory,
};
use crate::db::{Database, UserRepository};
use crate::web::dto::{LoginRequest, RegisterRequest, ValidatedJson};
use crate::web::error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database (posts are read and written through its pool).
    pub db: Database,
    /// Login and token minting.
    pub issuer: TokenIssuer,
    /// Admin gate for protected routes.
    pub validator: AccessValidator,
    /// Account creation.
    pub registrar: Registrar,
}

impl AppState {
    /// Create the application state backed by the SQLite user table.
    pub fn new(db: Database, jwt_secret: &str, bcrypt_cost: u32) -> Self {
        let directory: Arc<dyn UserDirectory> = Arc::new(UserRepository::new(db.pool().clone()));
        let hasher: Arc<dyn CredentialHasher> = Arc::new(BcryptHasher::new(bcrypt_cost));
        Self::with_parts(db, Arc::new(SigningKey::from_secret(jwt_secret)), directory, hasher)
    }

    /// Create the application state from explicit collaborators.
    pub fn with_parts(
        db: Database,
        key: Arc<SigningKey>,
        directory: Arc<dyn UserDirectory>,
        hasher: Arc<dyn CredentialHasher>,
    ) -> Self {
        let issuer = TokenIssuer::new(key.clone(), directory.clone(), hasher.clone());
        let validator = AccessValidator::new(key, directory.clone());
        let registrar = Registrar::new(directory, hasher, issuer.clone());
        Self {
            db,
            issuer,
            validator,
            registrar,
        }
    }
}

/// POST /register - Create an account and return a session token.
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<String>), ApiError> {
    let (_, token) = state.registrar.register(req.into()).await?;
    Ok((StatusCode::CREATED, Json(token)))
}

/// POST /login - Exchange credentials for a session token.
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<(StatusCode, Json<String>), ApiError> {
    let token = state.issuer.login(&req.into()).await?;
    Ok((StatusCode::CREATED, Json(token)))
}
