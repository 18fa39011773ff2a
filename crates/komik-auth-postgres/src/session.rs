//! PostgreSQL session storage.

use async_trait::async_trait;
use komik_auth::error::AuthResult;
use komik_auth::storage::SessionStorage;
use komik_auth::types::Session;
use sqlx_core::query::query;
use sqlx_core::query_as::query_as;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{PgPool, map_db_error};

type SessionTuple = (
    Uuid,
    Uuid,
    String,
    String,
    String,
    OffsetDateTime,
    OffsetDateTime,
    OffsetDateTime,
);

fn from_tuple(row: SessionTuple) -> Session {
    Session {
        id: row.0,
        user_id: row.1,
        refresh_token_hash: row.2,
        device_info: row.3,
        ip_address: row.4,
        expires_at: row.5,
        created_at: row.6,
        updated_at: row.7,
    }
}

/// [`SessionStorage`] backed by the `user_sessions` table.
pub struct PgSessionStorage {
    pool: PgPool,
}

impl PgSessionStorage {
    /// Creates a new storage over the given pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStorage for PgSessionStorage {
    async fn create(&self, session: &Session) -> AuthResult<()> {
        query(
            r#"
            INSERT INTO user_sessions
                (id, user_id, refresh_token_hash, device_info, ip_address,
                 expires_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(session.id)
        .bind(session.user_id)
        .bind(&session.refresh_token_hash)
        .bind(&session.device_info)
        .bind(&session.ip_address)
        .bind(session.expires_at)
        .bind(session.created_at)
        .bind(session.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;
        Ok(())
    }

    async fn list_by_user(&self, user_id: Uuid) -> AuthResult<Vec<Session>> {
        let rows: Vec<SessionTuple> = query_as(
            r#"
            SELECT id, user_id, refresh_token_hash, device_info, ip_address,
                   expires_at, created_at, updated_at
            FROM user_sessions
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;
        Ok(rows.into_iter().map(from_tuple).collect())
    }

    async fn rotate(
        &self,
        session_id: Uuid,
        new_hash: &str,
        new_expires_at: OffsetDateTime,
    ) -> AuthResult<()> {
        query(
            r#"
            UPDATE user_sessions
            SET refresh_token_hash = $2, expires_at = $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(session_id)
        .bind(new_hash)
        .bind(new_expires_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;
        Ok(())
    }

    async fn delete(&self, session_id: Uuid, user_id: Uuid) -> AuthResult<bool> {
        let result = query("DELETE FROM user_sessions WHERE id = $1 AND user_id = $2")
            .bind(session_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_most_recent(&self, user_id: Uuid) -> AuthResult<bool> {
        let result = query(
            r#"
            DELETE FROM user_sessions
            WHERE id = (
                SELECT id FROM user_sessions
                WHERE user_id = $1
                ORDER BY created_at DESC
                LIMIT 1
            )
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_all_for_user(&self, user_id: Uuid) -> AuthResult<u64> {
        let result = query("DELETE FROM user_sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(result.rows_affected())
    }
}
