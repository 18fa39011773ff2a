//! The authentication orchestrator.
//!
//! Composes credential storage, token signing, and the session
//! registry into the register/login/refresh/logout flows. This is the
//! only module that sees refresh-token plaintext next to stored
//! hashes; everything above it works with [`TokenPair`]s and
//! [`SessionInfo`] projections.

use std::sync::Arc;

use serde::Deserialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::{AuthError, AuthResult};
use crate::password;
use crate::storage::{SessionStorage, UserStorage};
use crate::token::{TokenPair, TokenService};
use crate::types::{PublicUser, Role, Session, SessionInfo, User};

/// Generic credential-failure message. Identical for unknown
/// identifiers and wrong passwords so responses cannot be used to
/// probe which accounts exist.
pub const INVALID_CREDENTIALS: &str = "Invalid email/username or password";

/// Rejection message for refresh tokens that fail signature
/// verification or match no live session.
pub const INVALID_REFRESH: &str = "Refresh token invalid or expired";

/// Rejection message for sessions past their registry-layer expiry.
pub const SESSION_EXPIRED: &str = "Session expired, please login again";

/// A well-formed Argon2id hash matching no real password. Verified
/// against when login hits an unknown identifier, so both login
/// failure paths pay the same hashing cost.
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$gZiV/M1gPc22ElAH/Jh1Hw$CWOrkoo7oJBQ/45WwgCwLgIFqkXIAzEzNVQz3Cm9w5g";

// ============================================================================
// Requests
// ============================================================================

/// Registration payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    /// Desired username. At least 3 characters.
    pub username: String,

    /// Email address.
    pub email: String,

    /// Display name.
    pub name: String,

    /// Password. At least 6 characters.
    pub password: String,
}

/// Login payload. The identifier matches either email or username.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Email or username.
    pub identifier: String,

    /// Password.
    pub password: String,
}

/// Request metadata captured at login for session provenance.
#[derive(Debug, Clone, Default)]
pub struct Provenance {
    /// User-Agent header, if present.
    pub device_info: Option<String>,

    /// Client address, if determinable.
    pub ip_address: Option<String>,
}

// ============================================================================
// Service
// ============================================================================

/// Orchestrates the authentication and session-lifecycle flows.
pub struct AuthService {
    users: Arc<dyn UserStorage>,
    sessions: Arc<dyn SessionStorage>,
    tokens: Arc<TokenService>,
    session_ttl: time::Duration,
}

impl AuthService {
    /// Creates the service from its storage backends and token
    /// service.
    #[must_use]
    pub fn new(
        users: Arc<dyn UserStorage>,
        sessions: Arc<dyn SessionStorage>,
        tokens: Arc<TokenService>,
        config: &AuthConfig,
    ) -> Self {
        Self {
            users,
            sessions,
            tokens,
            session_ttl: config.session_ttl,
        }
    }

    /// Registers a new user account.
    ///
    /// Creates no session and issues no tokens; a fresh registration
    /// still has to log in.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidRequest`] if the payload fails validation.
    /// - [`AuthError::Conflict`] if the email or username is taken.
    ///   The email conflict is checked first.
    pub async fn register(&self, request: RegisterRequest) -> AuthResult<PublicUser> {
        validate_registration(&request)?;

        if self.users.find_by_email(&request.email).await?.is_some() {
            return Err(AuthError::conflict("Email already registered"));
        }
        if self
            .users
            .find_by_username(&request.username)
            .await?
            .is_some()
        {
            return Err(AuthError::conflict("Username already taken"));
        }

        let password_hash = password::hash_blocking(request.password).await?;
        let user = User::new(
            request.username,
            request.email,
            request.name,
            password_hash,
            Role::User,
        );
        self.users.create(&user).await?;

        tracing::info!(user_id = %user.id, username = %user.username, "user registered");
        Ok(user.to_public())
    }

    /// Verifies credentials, opens a device session, and issues a
    /// token pair.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Unauthorized`] with [`INVALID_CREDENTIALS`]
    /// for both unknown identifiers and wrong passwords.
    pub async fn login(
        &self,
        request: LoginRequest,
        provenance: Provenance,
    ) -> AuthResult<(PublicUser, TokenPair)> {
        let Some(user) = self.users.find_by_identifier(&request.identifier).await? else {
            // Burn the same hashing cost as the known-user path.
            let _ = password::verify_blocking(request.password, DUMMY_HASH.to_string()).await?;
            return Err(AuthError::unauthorized(INVALID_CREDENTIALS));
        };

        let matches =
            password::verify_blocking(request.password, user.password_hash.clone()).await?;
        if !matches {
            tracing::debug!(user_id = %user.id, "login rejected: wrong password");
            return Err(AuthError::unauthorized(INVALID_CREDENTIALS));
        }

        let pair = self.issue_tokens(&user)?;
        let refresh_hash = password::hash_blocking(pair.refresh_token.clone()).await?;
        let session = Session::new(
            user.id,
            refresh_hash,
            provenance.device_info,
            provenance.ip_address,
            self.session_ttl,
        );
        self.sessions.create(&session).await?;

        tracing::info!(user_id = %user.id, session_id = %session.id, "login succeeded");
        Ok((user.to_public(), pair))
    }

    /// Rotates a refresh token: verifies it, finds its session by
    /// scanning the user's rows, and replaces the stored hash with a
    /// fresh pair's.
    ///
    /// The old refresh token is dead after this returns; replaying it
    /// finds no matching hash and is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Forbidden`] if the token fails signature
    /// verification, matches no session, the session is expired (the
    /// row is deleted first), or the user no longer exists.
    pub async fn refresh(&self, refresh_token: &str) -> AuthResult<TokenPair> {
        let claims = self
            .tokens
            .verify_refresh(refresh_token)
            .map_err(|err| {
                tracing::debug!(error = %err, "refresh token failed verification");
                AuthError::forbidden(INVALID_REFRESH)
            })?;
        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AuthError::forbidden(INVALID_REFRESH))?;

        // Hashes are salted, so there is no lookup by hash. Scan the
        // user's sessions and verify each candidate.
        let candidates = self.sessions.list_by_user(user_id).await?;
        let mut matched: Option<Session> = None;
        for session in candidates {
            if password::verify_blocking(
                refresh_token.to_string(),
                session.refresh_token_hash.clone(),
            )
            .await?
            {
                matched = Some(session);
                break;
            }
        }
        let Some(session) = matched else {
            tracing::debug!(user_id = %user_id, "refresh token matched no session");
            return Err(AuthError::forbidden(INVALID_REFRESH));
        };

        if session.is_expired() {
            self.sessions.delete(session.id, user_id).await?;
            tracing::debug!(session_id = %session.id, "expired session removed on refresh");
            return Err(AuthError::forbidden(SESSION_EXPIRED));
        }

        // Reload the user so the new claims reflect current state.
        let Some(user) = self.users.find_by_id(user_id).await? else {
            return Err(AuthError::forbidden(INVALID_REFRESH));
        };

        let pair = self.issue_tokens(&user)?;
        let new_hash = password::hash_blocking(pair.refresh_token.clone()).await?;
        let new_expiry = OffsetDateTime::now_utc() + self.session_ttl;
        self.sessions.rotate(session.id, &new_hash, new_expiry).await?;

        tracing::debug!(user_id = %user.id, session_id = %session.id, "refresh token rotated");
        Ok(pair)
    }

    /// Ends one session. With an explicit id the deletion is scoped to
    /// the caller's sessions; without one the most recent session is
    /// ended.
    ///
    /// Idempotent: deleting a session that is already gone, or one
    /// belonging to someone else, still succeeds.
    pub async fn logout(&self, user_id: Uuid, session_id: Option<Uuid>) -> AuthResult<()> {
        let deleted = match session_id {
            Some(id) => self.sessions.delete(id, user_id).await?,
            None => self.sessions.delete_most_recent(user_id).await?,
        };
        tracing::info!(user_id = %user_id, deleted, "logout");
        Ok(())
    }

    /// Ends every session the user has, returning the count.
    pub async fn logout_all(&self, user_id: Uuid) -> AuthResult<u64> {
        let count = self.sessions.delete_all_for_user(user_id).await?;
        tracing::info!(user_id = %user_id, count, "logout all devices");
        Ok(count)
    }

    /// Lists the user's active sessions, most recent first, without
    /// token hashes.
    pub async fn sessions(&self, user_id: Uuid) -> AuthResult<Vec<SessionInfo>> {
        let sessions = self.sessions.list_by_user(user_id).await?;
        Ok(sessions.iter().map(Session::to_info).collect())
    }

    /// Loads the caller's current profile from storage.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotFound`] if the account was deleted
    /// after the token was issued.
    pub async fn profile(&self, user_id: Uuid) -> AuthResult<PublicUser> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AuthError::not_found("User not found"))?;
        Ok(user.to_public())
    }

    fn issue_tokens(&self, user: &User) -> AuthResult<TokenPair> {
        self.tokens
            .issue_pair(user)
            .map_err(|e| AuthError::internal(format!("token issuance failed: {e}")))
    }
}

fn validate_registration(request: &RegisterRequest) -> AuthResult<()> {
    if request.username.len() < 3 {
        return Err(AuthError::invalid_request(
            "Username must be at least 3 characters",
        ));
    }
    if !request.email.contains('@') {
        return Err(AuthError::invalid_request("Email address is invalid"));
    }
    if request.name.trim().is_empty() {
        return Err(AuthError::invalid_request("Name must not be empty"));
    }
    if request.password.len() < 6 {
        return Err(AuthError::invalid_request(
            "Password must be at least 6 characters",
        ));
    }
    Ok(())
}
