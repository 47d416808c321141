use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::{Post, User};
use crate::domain::repositories::{PostRepository, RepositoryError, UserRepository};

/// In-memory `UserRepository`
///
/// Used when the service starts without a reachable database and as a test
/// fixture. Offers the same query semantics as the Postgres backend.
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    records: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

const USER_SEARCHABLE_FIELDS: &[&str] = &["username", "email", "name"];
const POST_SEARCHABLE_FIELDS: &[&str] = &["title", "content"];

fn matches(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, RepositoryError> {
        let records = self.records.read().await;
        Ok(records.get(id).filter(|u| u.status.is_active()).cloned())
    }

    async fn find_by_login(&self, identifier: &str) -> Result<Option<User>, RepositoryError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .find(|u| u.status.is_active() && (u.email == identifier || u.username == identifier))
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let records = self.records.read().await;
        let mut users: Vec<User> =
            records.values().filter(|u| u.status.is_active()).cloned().collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn search(&self, field: &str, value: &str) -> Result<Vec<User>, RepositoryError> {
        if !USER_SEARCHABLE_FIELDS.contains(&field) {
            return Err(RepositoryError::UnsearchableField(field.to_string()));
        }

        let records = self.records.read().await;
        let mut users: Vec<User> = records
            .values()
            .filter(|u| u.status.is_active())
            .filter(|u| match field {
                "username" => matches(&u.username, value),
                "email" => matches(&u.email, value),
                _ => matches(&u.name, value),
            })
            .cloned()
            .collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn insert(&self, user: &User) -> Result<(), RepositoryError> {
        let mut records = self.records.write().await;
        records.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), RepositoryError> {
        let mut records = self.records.write().await;
        records.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool, RepositoryError> {
        let mut records = self.records.write().await;
        Ok(records.remove(id).is_some())
    }
}

/// In-memory `PostRepository`
#[derive(Clone, Default)]
pub struct InMemoryPostRepository {
    records: Arc<RwLock<HashMap<String, Post>>>,
}

impl InMemoryPostRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Post>, RepositoryError> {
        let records = self.records.read().await;
        Ok(records.get(id).filter(|p| p.status.is_active()).cloned())
    }

    async fn list(&self) -> Result<Vec<Post>, RepositoryError> {
        let records = self.records.read().await;
        let mut posts: Vec<Post> =
            records.values().filter(|p| p.status.is_active()).cloned().collect();
        posts.sort_by_key(|p| p.created_at);
        Ok(posts)
    }

    async fn search(&self, field: &str, value: &str) -> Result<Vec<Post>, RepositoryError> {
        if !POST_SEARCHABLE_FIELDS.contains(&field) {
            return Err(RepositoryError::UnsearchableField(field.to_string()));
        }

        let records = self.records.read().await;
        let mut posts: Vec<Post> = records
            .values()
            .filter(|p| p.status.is_active())
            .filter(|p| match field {
                "title" => matches(&p.title, value),
                _ => matches(&p.content, value),
            })
            .cloned()
            .collect();
        posts.sort_by_key(|p| p.created_at);
        Ok(posts)
    }

    async fn insert(&self, post: &Post) -> Result<(), RepositoryError> {
        let mut records = self.records.write().await;
        records.insert(post.id.clone(), post.clone());
        Ok(())
    }

    async fn update(&self, post: &Post) -> Result<(), RepositoryError> {
        let mut records = self.records.write().await;
        records.insert(post.id.clone(), post.clone());
        Ok(())
    }
}
