//! In-memory storage backends.
//!
//! Backing store for development and tests. Semantics mirror the
//! PostgreSQL backends, including conflict precedence on user
//! creation and most-recent-first session ordering.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};
use crate::storage::{SessionStorage, UserStorage};
use crate::types::{Session, User};

/// In-memory [`UserStorage`].
#[derive(Default)]
pub struct MemoryUserStorage {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryUserStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> AuthResult<std::sync::RwLockReadGuard<'_, HashMap<Uuid, User>>> {
        self.users
            .read()
            .map_err(|_| AuthError::storage("user store lock poisoned"))
    }

    fn write(&self) -> AuthResult<std::sync::RwLockWriteGuard<'_, HashMap<Uuid, User>>> {
        self.users
            .write()
            .map_err(|_| AuthError::storage("user store lock poisoned"))
    }
}

#[async_trait]
impl UserStorage for MemoryUserStorage {
    async fn find_by_id(&self, id: Uuid) -> AuthResult<Option<User>> {
        Ok(self.read()?.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AuthResult<Option<User>> {
        Ok(self
            .read()?
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>> {
        Ok(self.read()?.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_identifier(&self, identifier: &str) -> AuthResult<Option<User>> {
        Ok(self
            .read()?
            .values()
            .find(|u| u.email == identifier || u.username == identifier)
            .cloned())
    }

    async fn create(&self, user: &User) -> AuthResult<()> {
        let mut users = self.write()?;

        // Email conflict takes precedence when both identifiers collide.
        if users.values().any(|u| u.email == user.email) {
            return Err(AuthError::conflict("Email already registered"));
        }
        if users.values().any(|u| u.username == user.username) {
            return Err(AuthError::conflict("Username already taken"));
        }

        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AuthResult<bool> {
        Ok(self.write()?.remove(&id).is_some())
    }
}

/// In-memory [`SessionStorage`].
#[derive(Default)]
pub struct MemorySessionStorage {
    sessions: RwLock<HashMap<Uuid, Session>>,
}

impl MemorySessionStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> AuthResult<std::sync::RwLockReadGuard<'_, HashMap<Uuid, Session>>> {
        self.sessions
            .read()
            .map_err(|_| AuthError::storage("session store lock poisoned"))
    }

    fn write(&self) -> AuthResult<std::sync::RwLockWriteGuard<'_, HashMap<Uuid, Session>>> {
        self.sessions
            .write()
            .map_err(|_| AuthError::storage("session store lock poisoned"))
    }
}

#[async_trait]
impl SessionStorage for MemorySessionStorage {
    async fn create(&self, session: &Session) -> AuthResult<()> {
        self.write()?.insert(session.id, session.clone());
        Ok(())
    }

    async fn list_by_user(&self, user_id: Uuid) -> AuthResult<Vec<Session>> {
        let mut sessions: Vec<Session> = self
            .read()?
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sessions)
    }

    async fn rotate(
        &self,
        session_id: Uuid,
        new_hash: &str,
        new_expires_at: OffsetDateTime,
    ) -> AuthResult<()> {
        let mut sessions = self.write()?;
        let session = sessions
            .get_mut(&session_id)
            .ok_or_else(|| AuthError::storage("session vanished during rotation"))?;
        session.refresh_token_hash = new_hash.to_string();
        session.expires_at = new_expires_at;
        session.updated_at = OffsetDateTime::now_utc();
        Ok(())
    }

    async fn delete(&self, session_id: Uuid, user_id: Uuid) -> AuthResult<bool> {
        let mut sessions = self.write()?;
        match sessions.get(&session_id) {
            Some(s) if s.user_id == user_id => {
                sessions.remove(&session_id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_most_recent(&self, user_id: Uuid) -> AuthResult<bool> {
        let mut sessions = self.write()?;
        let newest = sessions
            .values()
            .filter(|s| s.user_id == user_id)
            .max_by_key(|s| s.created_at)
            .map(|s| s.id);
        match newest {
            Some(id) => {
                sessions.remove(&id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_all_for_user(&self, user_id: Uuid) -> AuthResult<u64> {
        let mut sessions = self.write()?;
        let before = sessions.len();
        sessions.retain(|_, s| s.user_id != user_id);
        Ok((before - sessions.len()) as u64)
    }
}
