use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::{Post, User};

/// Errors surfaced by storage backends
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Field not searchable: {0}")]
    UnsearchableField(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Repository trait for account persistence
///
/// All read operations exclude archived records.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find an account by its identifier
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, RepositoryError>;

    /// Find an account by login identifier (email or username)
    async fn find_by_login(&self, identifier: &str) -> Result<Option<User>, RepositoryError>;

    /// List all live accounts
    async fn list(&self) -> Result<Vec<User>, RepositoryError>;

    /// Pattern-match a whitelisted field against `%value%`
    async fn search(&self, field: &str, value: &str) -> Result<Vec<User>, RepositoryError>;

    async fn insert(&self, user: &User) -> Result<(), RepositoryError>;

    async fn update(&self, user: &User) -> Result<(), RepositoryError>;

    /// Delete by identifier; returns whether a record was removed
    async fn delete(&self, id: &str) -> Result<bool, RepositoryError>;
}

/// Repository trait for post persistence
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Post>, RepositoryError>;

    async fn list(&self) -> Result<Vec<Post>, RepositoryError>;

    /// Pattern-match a whitelisted field against `%value%`
    async fn search(&self, field: &str, value: &str) -> Result<Vec<Post>, RepositoryError>;

    async fn insert(&self, post: &Post) -> Result<(), RepositoryError>;

    /// Posts are soft-deleted by archiving; see `Post::archive`
    async fn update(&self, post: &Post) -> Result<(), RepositoryError>;
}
