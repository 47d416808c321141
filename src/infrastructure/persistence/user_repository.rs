use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::domain::entities::User;
use crate::domain::repositories::{RepositoryError, UserRepository};
use crate::domain::value_objects::RecordStatus;

/// Fields a user search query may match against
const SEARCHABLE_FIELDS: &[&str] = &["username", "email", "name"];

/// `PostgreSQL` implementation of `UserRepository`
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_COLUMNS: &str =
    "id, username, email, name, image, password, status, created_at, updated_at";

fn map_row(row: &PgRow) -> Result<User, RepositoryError> {
    let status: String = row.get("status");
    Ok(User {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        name: row.get("name"),
        image: row.get("image"),
        password: row.get("password"),
        status: status
            .parse::<RecordStatus>()
            .map_err(RepositoryError::Database)?,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM users WHERE id = $1 AND status <> 'archive'"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row).transpose()
    }

    async fn find_by_login(&self, identifier: &str) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM users \
             WHERE (email = $1 OR username = $1) AND status <> 'archive'"
        ))
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row).transpose()
    }

    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM users WHERE status <> 'archive' ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row).collect()
    }

    async fn search(&self, field: &str, value: &str) -> Result<Vec<User>, RepositoryError> {
        if !SEARCHABLE_FIELDS.contains(&field) {
            return Err(RepositoryError::UnsearchableField(field.to_string()));
        }

        // The field name comes from the whitelist above; the value is bound
        let rows = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM users \
             WHERE status <> 'archive' AND {field} ILIKE $1 ORDER BY created_at"
        ))
        .bind(format!("%{value}%"))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row).collect()
    }

    async fn insert(&self, user: &User) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO users (id, username, email, name, image, password, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.image)
        .bind(&user.password)
        .bind(user.status.as_str())
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), RepositoryError> {
        sqlx::query(
            "UPDATE users SET username = $2, email = $3, name = $4, image = $5, \
             password = $6, status = $7, updated_at = $8 WHERE id = $1",
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.image)
        .bind(&user.password)
        .bind(user.status.as_str())
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
