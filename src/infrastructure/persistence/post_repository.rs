use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::domain::entities::Post;
use crate::domain::repositories::{PostRepository, RepositoryError};
use crate::domain::value_objects::RecordStatus;

/// Fields a post search query may match against
const SEARCHABLE_FIELDS: &[&str] = &["title", "content"];

/// `PostgreSQL` implementation of `PostRepository`
#[derive(Clone)]
pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_COLUMNS: &str =
    "id, title, content, published, status, created_at, updated_at, deleted_at";

fn map_row(row: &PgRow) -> Result<Post, RepositoryError> {
    let status: String = row.get("status");
    Ok(Post {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        published: row.get("published"),
        status: status
            .parse::<RecordStatus>()
            .map_err(RepositoryError::Database)?,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        deleted_at: row.get("deleted_at"),
    })
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Post>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM posts WHERE id = $1 AND status <> 'archive'"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row).transpose()
    }

    async fn list(&self) -> Result<Vec<Post>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM posts WHERE status <> 'archive' ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row).collect()
    }

    async fn search(&self, field: &str, value: &str) -> Result<Vec<Post>, RepositoryError> {
        if !SEARCHABLE_FIELDS.contains(&field) {
            return Err(RepositoryError::UnsearchableField(field.to_string()));
        }

        // The field name comes from the whitelist above; the value is bound
        let rows = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM posts \
             WHERE status <> 'archive' AND {field} ILIKE $1 ORDER BY created_at"
        ))
        .bind(format!("%{value}%"))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row).collect()
    }

    async fn insert(&self, post: &Post) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO posts (id, title, content, published, status, created_at, updated_at, deleted_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(&post.id)
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.published)
        .bind(post.status.as_str())
        .bind(post.created_at)
        .bind(post.updated_at)
        .bind(post.deleted_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(&self, post: &Post) -> Result<(), RepositoryError> {
        sqlx::query(
            "UPDATE posts SET title = $2, content = $3, published = $4, status = $5, \
             updated_at = $6, deleted_at = $7 WHERE id = $1",
        )
        .bind(&post.id)
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.published)
        .bind(post.status.as_str())
        .bind(post.updated_at)
        .bind(post.deleted_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
