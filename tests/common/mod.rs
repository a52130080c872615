//! Test helpers for Web API tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum_test::TestServer;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use blogd::web::handlers::AppState;
use blogd::web::router::create_router;
use blogd::Database;
use serde_json::{json, Value};

/// Secret used to sign test tokens.
pub const TEST_SECRET: &str = "test-secret-key-for-testing-only";

/// Lowest cost bcrypt accepts, to keep the tests fast.
pub const TEST_BCRYPT_COST: u32 = 4;

/// Default admin credentials.
pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "correct horse battery";

/// Create a test server with an in-memory database.
pub async fn create_test_server() -> (TestServer, Database) {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");

    let app_state = Arc::new(AppState::new(db.clone(), TEST_SECRET, TEST_BCRYPT_COST));
    let router = create_router(app_state);

    let server = TestServer::new(router).expect("Failed to create test server");
    (server, db)
}

/// Register an account and return the token from the response.
pub async fn register(server: &TestServer, email: &str, password: &str, is_admin: bool) -> String {
    let response = server
        .post("/register")
        .json(&json!({
            "email": email,
            "password": password,
            "is_admin": is_admin
        }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<String>()
}

/// Register the default admin and return its token.
pub async fn register_admin(server: &TestServer) -> String {
    register(server, ADMIN_EMAIL, ADMIN_PASSWORD, true).await
}

/// Create a post as the holder of `token`.
pub async fn create_post(server: &TestServer, token: &str, title: &str, content: &str) -> Value {
    let response = server
        .post("/posts")
        .add_header(
            axum::http::header::AUTHORIZATION,
            format!("Bearer {}", token),
        )
        .json(&json!({ "title": title, "content": content }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()
}

/// Decode the claims segment of a token without checking the signature.
pub fn decode_claims(token: &str) -> Value {
    let payload = token.split('.').nth(1).expect("token has no payload");
    let bytes = URL_SAFE_NO_PAD.decode(payload).expect("payload is not base64");
    serde_json::from_slice(&bytes).expect("payload is not JSON")
}

/// Flip one character of the signature segment.
pub fn tamper_signature(token: &str) -> String {
    let (head, sig) = token.rsplit_once('.').expect("token has no signature");
    let mut chars: Vec<char> = sig.chars().collect();
    chars[0] = if chars[0] == 'A' { 'B' } else { 'A' };
    format!("{}.{}", head, chars.into_iter().collect::<String>())
}
