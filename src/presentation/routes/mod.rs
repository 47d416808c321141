use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};

use crate::infrastructure::http::health_check;
use crate::presentation::handlers::{self, AppState};
use crate::presentation::middleware::{TokenCodec, require_session};

/// Create all application routes with application state
pub fn create_routes(state: AppState) -> Router {
    let codec = state.tokens.clone();

    Router::new()
        .route("/health", get(health_check))
        .merge(auth_routes(codec.clone()))
        .merge(post_routes())
        .merge(user_routes(codec))
        .with_state(state)
}

/// Session routes; data and refresh sit behind the authentication gate
fn auth_routes(codec: TokenCodec) -> Router<AppState> {
    let protected = Router::new()
        .route("/auth/session", post(handlers::auth::session_data))
        .route("/auth/refresh", post(handlers::auth::refresh))
        .route_layer(from_fn_with_state(codec, require_session));

    Router::new().route("/auth/login", post(handlers::auth::login)).merge(protected)
}

/// Post resource routes (public)
fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/post", get(handlers::posts::list_posts).post(handlers::posts::create_post))
        .route("/post/search", post(handlers::posts::search_posts))
        .route(
            "/post/{id}",
            get(handlers::posts::get_post)
                .put(handlers::posts::edit_post)
                .delete(handlers::posts::delete_post),
        )
}

/// User resource routes; registration is open, everything else requires a
/// session
fn user_routes(codec: TokenCodec) -> Router<AppState> {
    let protected = Router::new()
        .route("/user", get(handlers::users::list_users))
        .route("/user/search", post(handlers::users::search_users))
        .route(
            "/user/{id}",
            get(handlers::users::get_user)
                .put(handlers::users::edit_user)
                .delete(handlers::users::delete_user),
        )
        .route_layer(from_fn_with_state(codec, require_session));

    Router::new().route("/user", post(handlers::users::create_user)).merge(protected)
}
