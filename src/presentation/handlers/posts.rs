use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use super::AppState;
use crate::application::dto::SearchRequest;
use crate::domain::entities::{Post, PostMeta};
use crate::presentation::middleware::AppError;

fn post_not_found() -> AppError {
    AppError::NotFound { message: "Post is not found".to_string() }
}

/// Get a post by id
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Post>, AppError> {
    let post = state.posts.find_by_id(&id).await?.ok_or_else(post_not_found)?;
    Ok(Json(post))
}

/// List all live posts
pub async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<Post>>, AppError> {
    let posts = state.posts.list().await?;
    Ok(Json(posts))
}

/// Pattern-match posts on a single whitelisted field
pub async fn search_posts(
    State(state): State<AppState>,
    Json(search): Json<SearchRequest>,
) -> Result<Json<Vec<Post>>, AppError> {
    let posts = state.posts.search(&search.field, &search.value).await?;
    Ok(Json(posts))
}

/// Create a post
pub async fn create_post(
    State(state): State<AppState>,
    Json(meta): Json<PostMeta>,
) -> Result<(StatusCode, Json<Post>), AppError> {
    let post = Post::create(meta);
    state.posts.insert(&post).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// Edit a post
pub async fn edit_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(meta): Json<PostMeta>,
) -> Result<Json<Post>, AppError> {
    let mut post = state.posts.find_by_id(&id).await?.ok_or_else(post_not_found)?;
    post.apply(meta);
    state.posts.update(&post).await?;
    Ok(Json(post))
}

/// Soft-delete a post by archiving it
pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let mut post = state.posts.find_by_id(&id).await?.ok_or_else(post_not_found)?;
    post.archive();
    state.posts.update(&post).await?;
    Ok(StatusCode::NO_CONTENT)
}
