//! Session storage trait.

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::AuthResult;
use crate::types::Session;

/// Storage backend for refresh sessions.
///
/// There is no lookup by refresh-token hash: hashes are salted and
/// non-deterministic, so the rotation protocol lists a user's sessions
/// and verifies each candidate.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Persists a new session.
    async fn create(&self, session: &Session) -> AuthResult<()>;

    /// Lists all sessions for a user, most recently created first.
    async fn list_by_user(&self, user_id: Uuid) -> AuthResult<Vec<Session>>;

    /// Replaces a session's token hash and expiry in place, keeping
    /// its id. Bumps the update timestamp.
    async fn rotate(
        &self,
        session_id: Uuid,
        new_hash: &str,
        new_expires_at: OffsetDateTime,
    ) -> AuthResult<()>;

    /// Deletes one session, scoped to its owner. Returns `true` if a
    /// row was removed.
    async fn delete(&self, session_id: Uuid, user_id: Uuid) -> AuthResult<bool>;

    /// Deletes the user's most recently created session. Returns
    /// `true` if a row was removed.
    async fn delete_most_recent(&self, user_id: Uuid) -> AuthResult<bool>;

    /// Deletes every session the user has. Returns the number of rows
    /// removed.
    async fn delete_all_for_user(&self, user_id: Uuid) -> AuthResult<u64>;
}
