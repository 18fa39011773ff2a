//! User storage trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AuthResult;
use crate::types::User;

/// Storage backend for user accounts.
///
/// Lookups return `Ok(None)` for absent users; `Err` is reserved for
/// backend failures.
#[async_trait]
pub trait UserStorage: Send + Sync {
    /// Finds a user by id.
    async fn find_by_id(&self, id: Uuid) -> AuthResult<Option<User>>;

    /// Finds a user by username.
    async fn find_by_username(&self, username: &str) -> AuthResult<Option<User>>;

    /// Finds a user by email.
    async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>>;

    /// Finds a user by either email or username, whichever matches.
    async fn find_by_identifier(&self, identifier: &str) -> AuthResult<Option<User>>;

    /// Persists a new user.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AuthError::Conflict`] if the email or username
    /// is already taken. When both collide the email conflict is
    /// reported.
    async fn create(&self, user: &User) -> AuthResult<()>;

    /// Deletes a user. Returns `true` if a row was removed.
    async fn delete(&self, id: Uuid) -> AuthResult<bool>;
}
