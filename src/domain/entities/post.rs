use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::user::now_millis;
use crate::domain::value_objects::RecordStatus;

/// Author-supplied fields of a post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostMeta {
    pub title: String,
    pub content: String,
    #[serde(default = "default_published")]
    pub published: bool,
}

fn default_published() -> bool {
    true
}

/// Stored post record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub published: bool,
    pub status: RecordStatus,
    pub created_at: i64,
    pub updated_at: Option<i64>,
    pub deleted_at: Option<i64>,
}

impl Post {
    #[must_use]
    pub fn create(meta: PostMeta) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: meta.title,
            content: meta.content,
            published: meta.published,
            status: RecordStatus::Active,
            created_at: now_millis(),
            updated_at: None,
            deleted_at: None,
        }
    }

    /// Apply an edit and bump `updated_at`
    pub fn apply(&mut self, meta: PostMeta) {
        self.title = meta.title;
        self.content = meta.content;
        self.published = meta.published;
        self.updated_at = Some(now_millis());
    }

    /// Soft-delete: archived posts stay in storage but drop out of queries
    pub fn archive(&mut self) {
        self.status = RecordStatus::Archive;
        self.deleted_at = Some(now_millis());
    }
}
