//! PostgreSQL storage backend for komik-auth.
//!
//! Implements the `UserStorage` and `SessionStorage` traits on top of
//! two tables, `users` and `user_sessions`. Schema setup is handled by
//! [`run_migrations`] at startup.
//!
//! # Example
//!
//! ```ignore
//! use komik_auth_postgres::{connect, run_migrations, PgSessionStorage, PgUserStorage};
//!
//! let pool = connect("postgres://localhost/komik", 5).await?;
//! run_migrations(&pool).await?;
//! let users = PgUserStorage::new(pool.clone());
//! ```

pub mod session;
pub mod user;

use komik_auth::{AuthError, AuthResult};
use sqlx_core::pool::Pool;
use sqlx_postgres::{PgPoolOptions, Postgres};

pub use session::PgSessionStorage;
pub use user::PgUserStorage;

/// PostgreSQL connection pool type alias.
pub type PgPool = Pool<Postgres>;

/// Opens a connection pool against the given database URL.
///
/// # Errors
///
/// Returns [`AuthError::Storage`] if the pool cannot be established.
pub async fn connect(database_url: &str, max_connections: u32) -> AuthResult<PgPool> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .map_err(|e| AuthError::storage(format!("failed to connect to PostgreSQL: {e}")))
}

/// Creates the auth tables if they do not exist.
///
/// Idempotent, intended to run on every startup.
///
/// # Errors
///
/// Returns [`AuthError::Storage`] if any statement fails.
pub async fn run_migrations(pool: &PgPool) -> AuthResult<()> {
    sqlx_core::raw_sql::raw_sql(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY,
            username TEXT NOT NULL,
            email TEXT NOT NULL,
            name TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            role TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL,
            CONSTRAINT users_username_key UNIQUE (username),
            CONSTRAINT users_email_key UNIQUE (email)
        );

        CREATE TABLE IF NOT EXISTS user_sessions (
            id UUID PRIMARY KEY,
            user_id UUID NOT NULL REFERENCES users (id) ON DELETE CASCADE,
            refresh_token_hash TEXT NOT NULL,
            device_info TEXT NOT NULL,
            ip_address TEXT NOT NULL,
            expires_at TIMESTAMPTZ NOT NULL,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        );

        CREATE INDEX IF NOT EXISTS user_sessions_user_id_idx
            ON user_sessions (user_id);
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| AuthError::storage(format!("migration failed: {e}")))?;

    tracing::debug!("auth schema migrations applied");
    Ok(())
}

/// Maps a database error onto the auth error taxonomy.
///
/// Unique violations on the users table become `Conflict` with the
/// same messages the in-memory backend uses; everything else is a
/// `Storage` error.
pub(crate) fn map_db_error(err: sqlx_core::Error) -> AuthError {
    if let sqlx_core::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return match db_err.constraint() {
                Some("users_email_key") => AuthError::conflict("Email already registered"),
                Some("users_username_key") => AuthError::conflict("Username already taken"),
                _ => AuthError::conflict("Resource already exists"),
            };
        }
    }
    AuthError::storage(format!("database error: {err}"))
}
