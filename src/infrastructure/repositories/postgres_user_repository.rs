use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::map_sqlx_error;
use crate::domain::error::DomainError;
use crate::domain::repositories::UserRepository;
use crate::domain::user::{Email, User, Username};

const USER_COLUMNS: &str = "id, username, email, password_hash, role, created_at";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = DomainError;

    fn try_from(r: UserRow) -> Result<Self, Self::Error> {
        let invalid = |e: DomainError| DomainError::storage(format!("Invalid user row {}: {}", r.id, e));
        Ok(User {
            id: r.id,
            username: Username::new(&r.username).map_err(invalid)?,
            email: Email::new(r.email.clone()).map_err(invalid)?,
            password_hash: r.password_hash.clone(),
            role: r.role.parse().map_err(invalid)?,
            created_at: r.created_at,
        })
    }
}

/// PostgreSQL implementation of UserRepository
///
/// Team membership rows reference users with `ON DELETE CASCADE`, so
/// deleting a user pulls it from every team in the same statement.
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new PostgresUserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: &User) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, role, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id)
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to create user"))?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to find user by id"))?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to find user by email"))?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE id = ANY($1)",
            USER_COLUMNS
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to find users by id"))?;

        let mut users = rows
            .into_iter()
            .map(User::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        users.sort_by_key(|u| ids.iter().position(|id| *id == u.id));
        Ok(users)
    }

    async fn find_all(&self) -> Result<Vec<User>, DomainError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users ORDER BY created_at, id",
            USER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to list users"))?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn update(&self, user: &User) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET username = $2, email = $3, password_hash = $4, role = $5
            WHERE id = $1
            "#,
        )
        .bind(user.id)
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to update user"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::missing("User", user.id));
        }

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "Failed to delete user"))?;

        Ok(result.rows_affected() > 0)
    }
}
