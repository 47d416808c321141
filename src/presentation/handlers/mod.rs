pub mod auth;
pub mod posts;
pub mod users;

use std::sync::Arc;

use crate::domain::repositories::{PostRepository, UserRepository};
use crate::presentation::middleware::TokenCodec;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub tokens: TokenCodec,
    pub token_ttl: chrono::Duration,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        tokens: TokenCodec,
        token_ttl: chrono::Duration,
    ) -> Self {
        Self { users, posts, tokens, token_ttl }
    }
}
