//! Web API Post Tests
//!
//! Integration tests for public reads and admin-only writes of posts.

mod common;

use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use common::{create_post, create_test_server, decode_claims, register, register_admin};
use serde_json::{json, Value};

// ============================================================================
// Public Reads
// ============================================================================

#[tokio::test]
async fn test_list_posts_empty() {
    let (server, _db) = create_test_server().await;

    let response = server.get("/posts").await;

    response.assert_status_ok();
    let body: Vec<Value> = response.json();
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_list_posts_newest_first() {
    let (server, _db) = create_test_server().await;
    let token = register_admin(&server).await;

    create_post(&server, &token, "First", "one").await;
    create_post(&server, &token, "Second", "two").await;
    create_post(&server, &token, "Third", "three").await;

    let body: Vec<Value> = server.get("/posts").await.json();
    let titles: Vec<&str> = body.iter().map(|p| p["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["Third", "Second", "First"]);
}

#[tokio::test]
async fn test_list_posts_contains_and_limit() {
    let (server, _db) = create_test_server().await;
    let token = register_admin(&server).await;

    create_post(&server, &token, "Rust notes", "ownership").await;
    create_post(&server, &token, "Gardening", "tomatoes").await;
    create_post(&server, &token, "More", "rust and Rust").await;

    let response = server
        .get("/posts")
        .add_query_param("contains", "Rust")
        .await;
    response.assert_status_ok();
    let body: Vec<Value> = response.json();
    assert_eq!(body.len(), 2);

    let response = server.get("/posts").add_query_param("limit", 1).await;
    let body: Vec<Value> = response.json();
    assert_eq!(body.len(), 1);
    assert_eq!(body[0]["title"], "More");

    // Empty filter matches everything
    let response = server.get("/posts").add_query_param("contains", "").await;
    let body: Vec<Value> = response.json();
    assert_eq!(body.len(), 3);
}

#[tokio::test]
async fn test_list_posts_bad_limit() {
    let (server, _db) = create_test_server().await;

    let response = server
        .get("/posts")
        .add_query_param("limit", "many")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_post() {
    let (server, _db) = create_test_server().await;
    let token = register_admin(&server).await;
    let created = create_post(&server, &token, "Hello", "World").await;
    let id = created["id"].as_i64().unwrap();

    let response = server.get(&format!("/posts/{}", id)).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["title"], "Hello");
    assert_eq!(body["content"], "World");
    assert_eq!(body["author"], decode_claims(&token)["sub"]);
}

#[tokio::test]
async fn test_get_post_not_found() {
    let (server, _db) = create_test_server().await;

    let response = server.get("/posts/999").await;

    response.assert_status_not_found();
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_get_post_bad_id() {
    let (server, _db) = create_test_server().await;

    let response = server.get("/posts/abc").await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

// ============================================================================
// Admin Writes
// ============================================================================

#[tokio::test]
async fn test_create_post_as_admin() {
    let (server, _db) = create_test_server().await;
    let token = register_admin(&server).await;

    let body = create_post(&server, &token, "Title", "Body").await;

    assert!(body["id"].as_i64().unwrap() > 0);
    assert_eq!(body["author"], decode_claims(&token)["sub"]);
    assert_eq!(body["created_at"], body["updated_at"]);
}

#[tokio::test]
async fn test_create_post_without_token() {
    let (server, _db) = create_test_server().await;

    let response = server
        .post("/posts")
        .json(&json!({ "title": "Title", "content": "Body" }))
        .await;

    response.assert_status_unauthorized();
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_create_post_malformed_header() {
    let (server, _db) = create_test_server().await;
    let token = register_admin(&server).await;

    for header in [
        token.clone(),
        format!("Basic {}", token),
        format!("Bearer  {}", token),
        "Bearer".to_string(),
    ] {
        let response = server
            .post("/posts")
            .add_header(AUTHORIZATION, header)
            .json(&json!({ "title": "Title", "content": "Body" }))
            .await;
        response.assert_status_unauthorized();
    }
}

#[tokio::test]
async fn test_create_post_non_admin() {
    let (server, _db) = create_test_server().await;
    register_admin(&server).await;
    let token = register(&server, "reader@example.com", "password1234", false).await;

    let response = server
        .post("/posts")
        .add_header(AUTHORIZATION, format!("Bearer {}", token))
        .json(&json!({ "title": "Title", "content": "Body" }))
        .await;

    response.assert_status_unauthorized();
    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "access denied");
}

#[tokio::test]
async fn test_create_post_validation() {
    let (server, _db) = create_test_server().await;
    let token = register_admin(&server).await;

    let response = server
        .post("/posts")
        .add_header(AUTHORIZATION, format!("Bearer {}", token))
        .json(&json!({ "title": "   ", "content": "Body" }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let response = server
        .post("/posts")
        .add_header(AUTHORIZATION, format!("Bearer {}", token))
        .json(&json!({ "title": "x".repeat(201), "content": "Body" }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let response = server
        .post("/posts")
        .add_header(AUTHORIZATION, format!("Bearer {}", token))
        .json(&json!({ "title": "Title", "content": "" }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert!(body["error"]["details"]["content"].is_array());
}

#[tokio::test]
async fn test_update_post() {
    let (server, _db) = create_test_server().await;
    let token = register_admin(&server).await;
    let created = create_post(&server, &token, "Old", "old body").await;
    let id = created["id"].as_i64().unwrap();

    let response = server
        .put(&format!("/posts/{}", id))
        .add_header(AUTHORIZATION, format!("Bearer {}", token))
        .json(&json!({ "title": "New", "content": "new body" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["id"], created["id"]);
    assert_eq!(body["title"], "New");
    assert_eq!(body["content"], "new body");
    assert_eq!(body["author"], created["author"]);
    assert_eq!(body["created_at"], created["created_at"]);

    let fetched: Value = server.get(&format!("/posts/{}", id)).await.json();
    assert_eq!(fetched["title"], "New");
}

#[tokio::test]
async fn test_update_post_not_found() {
    let (server, _db) = create_test_server().await;
    let token = register_admin(&server).await;

    let response = server
        .put("/posts/42")
        .add_header(AUTHORIZATION, format!("Bearer {}", token))
        .json(&json!({ "title": "New", "content": "new body" }))
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_update_post_without_token() {
    let (server, _db) = create_test_server().await;
    let token = register_admin(&server).await;
    let created = create_post(&server, &token, "Old", "old body").await;

    let response = server
        .put(&format!("/posts/{}", created["id"]))
        .json(&json!({ "title": "New", "content": "new body" }))
        .await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn test_delete_post() {
    let (server, _db) = create_test_server().await;
    let token = register_admin(&server).await;
    let created = create_post(&server, &token, "Doomed", "bye").await;
    let id = created["id"].as_i64().unwrap();

    let response = server
        .delete(&format!("/posts/{}", id))
        .add_header(AUTHORIZATION, format!("Bearer {}", token))
        .await;
    response.assert_status(StatusCode::NO_CONTENT);

    server
        .get(&format!("/posts/{}", id))
        .await
        .assert_status_not_found();

    let response = server
        .delete(&format!("/posts/{}", id))
        .add_header(AUTHORIZATION, format!("Bearer {}", token))
        .await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn test_delete_post_non_admin() {
    let (server, _db) = create_test_server().await;
    let admin = register_admin(&server).await;
    let reader = register(&server, "reader@example.com", "password1234", false).await;
    let created = create_post(&server, &admin, "Stays", "here").await;

    let response = server
        .delete(&format!("/posts/{}", created["id"]))
        .add_header(AUTHORIZATION, format!("Bearer {}", reader))
        .await;

    response.assert_status_unauthorized();
    server
        .get(&format!("/posts/{}", created["id"]))
        .await
        .assert_status_ok();
}
