use axum::{Extension, Form, Json, extract::State};
use serde_json::Value;
use tracing::info;

use super::AppState;
use crate::application::dto::LoginRequest;
use crate::presentation::middleware::{AppError, IssuedToken, SessionClaims};

/// Exchange a username/password form for an access token
///
/// The username field accepts either the account's email or its username.
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginRequest>,
) -> Result<Json<IssuedToken>, AppError> {
    let user = state
        .users
        .find_by_login(&form.username)
        .await?
        .ok_or_else(|| AppError::NotFound { message: "Account not found".to_string() })?;

    if !user.verify_password(&form.password) {
        return Err(AppError::Authentication {
            message: "Incorrect username or password".to_string(),
        });
    }

    let token = state.tokens.issue(user.safe_claims(), Some(state.token_ttl))?;
    info!(user_id = %user.id, "Issued access token");

    Ok(Json(token))
}

/// Echo the decoded session claims attached by the authentication gate
pub async fn session_data(
    Extension(claims): Extension<SessionClaims>,
) -> Json<Value> {
    Json(Value::Object(claims.subject))
}

/// Re-issue a token from the current session's claims with a fresh expiry
pub async fn refresh(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<Json<IssuedToken>, AppError> {
    let token = state.tokens.issue(claims.subject, Some(state.token_ttl))?;
    Ok(Json(token))
}
