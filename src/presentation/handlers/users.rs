use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::info;

use super::AppState;
use crate::application::dto::{SearchRequest, UserDto};
use crate::domain::entities::{NewUser, User, UserMeta};
use crate::presentation::middleware::AppError;

fn account_not_found() -> AppError {
    AppError::NotFound { message: "Account not found".to_string() }
}

/// Register a new account
///
/// The raw password is hashed before the record is stored; responses only
/// ever carry the safe projection.
pub async fn create_user(
    State(state): State<AppState>,
    Json(new_user): Json<NewUser>,
) -> Result<(StatusCode, Json<UserDto>), AppError> {
    for taken in [&new_user.username, &new_user.email] {
        if state.users.find_by_login(taken).await?.is_some() {
            return Err(AppError::Conflict {
                message: "Username or email already registered".to_string(),
            });
        }
    }

    let user = User::register(new_user);
    state.users.insert(&user).await?;
    info!(user_id = %user.id, "Registered account");

    Ok((StatusCode::CREATED, Json(UserDto::from(&user))))
}

/// Get an account by id
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserDto>, AppError> {
    let user = state.users.find_by_id(&id).await?.ok_or_else(account_not_found)?;
    Ok(Json(UserDto::from(&user)))
}

/// List all live accounts
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserDto>>, AppError> {
    let users = state.users.list().await?;
    Ok(Json(users.iter().map(UserDto::from).collect()))
}

/// Pattern-match accounts on a single whitelisted field
pub async fn search_users(
    State(state): State<AppState>,
    Json(search): Json<SearchRequest>,
) -> Result<Json<Vec<UserDto>>, AppError> {
    let users = state.users.search(&search.field, &search.value).await?;
    Ok(Json(users.iter().map(UserDto::from).collect()))
}

/// Edit an account's profile fields
pub async fn edit_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(meta): Json<UserMeta>,
) -> Result<Json<UserDto>, AppError> {
    let mut user = state.users.find_by_id(&id).await?.ok_or_else(account_not_found)?;
    user.apply(meta);
    state.users.update(&user).await?;
    Ok(Json(UserDto::from(&user)))
}

/// Delete an account
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !state.users.delete(&id).await? {
        return Err(account_not_found());
    }
    Ok(StatusCode::NO_CONTENT)
}
