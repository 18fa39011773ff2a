//! PostgreSQL user storage.

use async_trait::async_trait;
use komik_auth::error::{AuthError, AuthResult};
use komik_auth::storage::UserStorage;
use komik_auth::types::{Role, User};
use sqlx_core::query::query;
use sqlx_core::query_as::query_as;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{PgPool, map_db_error};

type UserTuple = (
    Uuid,
    String,
    String,
    String,
    String,
    String,
    OffsetDateTime,
    OffsetDateTime,
);

fn from_tuple(row: UserTuple) -> AuthResult<User> {
    let role = Role::parse(&row.5)
        .ok_or_else(|| AuthError::storage(format!("unknown role in users row: {}", row.5)))?;
    Ok(User {
        id: row.0,
        username: row.1,
        email: row.2,
        name: row.3,
        password_hash: row.4,
        role,
        created_at: row.6,
        updated_at: row.7,
    })
}

const USER_COLUMNS: &str =
    "id, username, email, name, password_hash, role, created_at, updated_at";

/// [`UserStorage`] backed by the `users` table.
pub struct PgUserStorage {
    pool: PgPool,
}

impl PgUserStorage {
    /// Creates a new storage over the given pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, where_clause: &str, bind: &str) -> AuthResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {where_clause}");
        let row: Option<UserTuple> = query_as(&sql)
            .bind(bind)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;
        row.map(from_tuple).transpose()
    }
}

#[async_trait]
impl UserStorage for PgUserStorage {
    async fn find_by_id(&self, id: Uuid) -> AuthResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row: Option<UserTuple> = query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;
        row.map(from_tuple).transpose()
    }

    async fn find_by_username(&self, username: &str) -> AuthResult<Option<User>> {
        self.find_one("username = $1", username).await
    }

    async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>> {
        self.find_one("email = $1", email).await
    }

    async fn find_by_identifier(&self, identifier: &str) -> AuthResult<Option<User>> {
        self.find_one("email = $1 OR username = $1", identifier)
            .await
    }

    async fn create(&self, user: &User) -> AuthResult<()> {
        query(
            r#"
            INSERT INTO users
                (id, username, email, name, password_hash, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AuthResult<bool> {
        let result = query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(result.rows_affected() > 0)
    }
}
