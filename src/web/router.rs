//! Router configuration for Web API.

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use super::handlers::{
    create_post, delete_post, get_post, list_posts, login, register, update_post, AppState,
};
use super::middleware::require_admin;

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    // Routes open to everyone
    let public_routes = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/posts", get(list_posts))
        .route("/posts/:id", get(get_post));

    // Routes that need an admin token
    let admin_routes = Router::new()
        .route("/posts", post(create_post))
        .route("/posts/:id", put(update_post).delete(delete_post))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            require_admin,
        ));

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .with_state(app_state)
        .merge(create_health_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new()),
        )
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
