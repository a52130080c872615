//! Web API Authentication Tests
//!
//! Integration tests for registration and login.

mod common;

use axum::http::StatusCode;
use blogd::auth::SUBJECT_PREFIX;
use blogd::UserRepository;
use common::{
    create_test_server, decode_claims, register, register_admin, ADMIN_EMAIL, ADMIN_PASSWORD,
};
use serde_json::{json, Value};

// ============================================================================
// Registration Tests
// ============================================================================

#[tokio::test]
async fn test_register_success() {
    let (server, db) = create_test_server().await;

    let response = server
        .post("/register")
        .json(&json!({
            "email": "reader@example.com",
            "password": "password1234"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let token: String = response.json();
    assert_eq!(token.split('.').count(), 3);

    let claims = decode_claims(&token);
    let subject = claims["sub"].as_str().unwrap();
    assert!(subject.starts_with(SUBJECT_PREFIX));
    assert!(claims["exp"].as_i64().unwrap() > claims["iat"].as_i64().unwrap());

    let repo = UserRepository::new(db.pool().clone());
    let user = repo.get_by_subject_id(subject).await.unwrap().unwrap();
    assert_eq!(user.email, "reader@example.com");
    assert!(!user.is_admin);
    assert_ne!(user.password_hash, "password1234");
}

#[tokio::test]
async fn test_register_admin() {
    let (server, db) = create_test_server().await;

    let token = register_admin(&server).await;
    let subject = decode_claims(&token)["sub"].as_str().unwrap().to_string();

    let repo = UserRepository::new(db.pool().clone());
    let user = repo.get_by_subject_id(&subject).await.unwrap().unwrap();
    assert!(user.is_admin);
}

#[tokio::test]
async fn test_register_second_admin_forbidden() {
    let (server, db) = create_test_server().await;
    register_admin(&server).await;

    let response = server
        .post("/register")
        .json(&json!({
            "email": "other-admin@example.com",
            "password": "password1234",
            "is_admin": true
        }))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "FORBIDDEN");

    let repo = UserRepository::new(db.pool().clone());
    assert!(repo
        .get_by_email("other-admin@example.com")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_register_non_admin_after_admin() {
    let (server, _db) = create_test_server().await;
    register_admin(&server).await;

    register(&server, "reader@example.com", "password1234", false).await;
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let (server, _db) = create_test_server().await;
    register(&server, "reader@example.com", "password1234", false).await;

    let response = server
        .post("/register")
        .json(&json!({
            "email": "reader@example.com",
            "password": "another-password"
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_register_duplicate_email_differing_case() {
    let (server, _db) = create_test_server().await;
    register(&server, "Alice@example.com", "password1234", false).await;

    let response = server
        .post("/register")
        .json(&json!({
            "email": "alice@example.com",
            "password": "another-password"
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);

    // The original account still logs in with its own password
    let response = server
        .post("/login")
        .json(&json!({
            "email": "alice@example.com",
            "password": "password1234"
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn test_register_invalid_email() {
    let (server, _db) = create_test_server().await;

    let response = server
        .post("/register")
        .json(&json!({
            "email": "not-an-email",
            "password": "password1234"
        }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["details"]["email"].is_array());
}

#[tokio::test]
async fn test_register_short_password() {
    let (server, _db) = create_test_server().await;

    let response = server
        .post("/register")
        .json(&json!({
            "email": "reader@example.com",
            "password": "short"
        }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert!(body["error"]["details"]["password"].is_array());
}

#[tokio::test]
async fn test_register_password_too_long() {
    let (server, _db) = create_test_server().await;

    let response = server
        .post("/register")
        .json(&json!({
            "email": "reader@example.com",
            "password": "x".repeat(73)
        }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_register_malformed_json() {
    let (server, _db) = create_test_server().await;

    let response = server
        .post("/register")
        .text("{\"email\": ")
        .content_type("application/json")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

// ============================================================================
// Login Tests
// ============================================================================

#[tokio::test]
async fn test_login_success() {
    let (server, _db) = create_test_server().await;
    let registered = register_admin(&server).await;

    let response = server
        .post("/login")
        .json(&json!({
            "email": ADMIN_EMAIL,
            "password": ADMIN_PASSWORD
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let token: String = response.json();
    assert_eq!(
        decode_claims(&token)["sub"],
        decode_claims(&registered)["sub"]
    );
}

#[tokio::test]
async fn test_login_wrong_password() {
    let (server, _db) = create_test_server().await;
    register_admin(&server).await;

    let response = server
        .post("/login")
        .json(&json!({
            "email": ADMIN_EMAIL,
            "password": "wrong password!"
        }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    assert_eq!(body["error"]["message"], "invalid email or password");
}

#[tokio::test]
async fn test_login_unknown_email_same_message() {
    let (server, _db) = create_test_server().await;

    let response = server
        .post("/login")
        .json(&json!({
            "email": "nobody@example.com",
            "password": "password1234"
        }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "invalid email or password");
}

#[tokio::test]
async fn test_login_invalid_body() {
    let (server, _db) = create_test_server().await;

    let response = server
        .post("/login")
        .json(&json!({ "email": "nobody@example.com" }))
        .await;

    // Missing field fails deserialization
    response.assert_status(StatusCode::BAD_REQUEST);
}
