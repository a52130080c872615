//! Blog post handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::AppState;
use crate::blog::{NewPost, PostRepository};
use crate::web::dto::{
    CreatePostRequest, ListPostsQuery, PostResponse, UpdatePostRequest, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::middleware::AuthSubject;

/// GET /posts - List posts, newest first.
pub async fn list_posts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListPostsQuery>,
) -> Result<Json<Vec<PostResponse>>, ApiError> {
    let repo = PostRepository::new(state.db.pool());
    let posts = repo.list(&query.into()).await?;
    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

/// GET /posts/:id - Get a single post.
pub async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<i64>,
) -> Result<Json<PostResponse>, ApiError> {
    let repo = PostRepository::new(state.db.pool());
    let post = repo
        .get_by_id(post_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;
    Ok(Json(post.into()))
}

/// POST /posts - Create a post. The author is the authenticated admin.
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    AuthSubject(author): AuthSubject,
    ValidatedJson(req): ValidatedJson<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), ApiError> {
    let repo = PostRepository::new(state.db.pool());
    let post = repo
        .create(&NewPost::new(author, req.title, req.content))
        .await?;
    tracing::info!(post_id = post.id, "post created");
    Ok((StatusCode::CREATED, Json(post.into())))
}

/// PUT /posts/:id - Replace title and content of a post.
pub async fn update_post(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdatePostRequest>,
) -> Result<Json<PostResponse>, ApiError> {
    let repo = PostRepository::new(state.db.pool());
    let post = repo
        .update(post_id, &req.into())
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;
    tracing::info!(post_id = post.id, "post updated");
    Ok(Json(post.into()))
}

/// DELETE /posts/:id - Delete a post.
pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let repo = PostRepository::new(state.db.pool());
    if !repo.delete(post_id).await? {
        return Err(ApiError::not_found("Post not found"));
    }
    tracing::info!(post_id, "post deleted");
    Ok(StatusCode::NO_CONTENT)
}
