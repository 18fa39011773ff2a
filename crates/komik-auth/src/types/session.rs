//! Per-device sessions.
//!
//! One session row per active device. The row stores a salted hash of
//! the refresh token, never the plaintext, so a database leak does not
//! yield usable tokens. The hash is non-deterministic, which is why
//! session lookup during rotation scans the user's rows instead of
//! querying by hash (see [`crate::service`]).

use serde::Serialize;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

/// Provenance placeholder when a request carried no usable metadata.
pub const UNKNOWN_PROVENANCE: &str = "Unknown";

/// A stored refresh session for one device.
#[derive(Debug, Clone)]
pub struct Session {
    /// Unique identifier. Stable across rotations.
    pub id: Uuid,

    /// Owning user.
    pub user_id: Uuid,

    /// Salted Argon2id hash of the current refresh token.
    pub refresh_token_hash: String,

    /// Device description captured at login (User-Agent).
    pub device_info: String,

    /// Client address captured at login.
    pub ip_address: String,

    /// Session expiry. Renewed on every rotation.
    pub expires_at: OffsetDateTime,

    /// Creation timestamp.
    pub created_at: OffsetDateTime,

    /// Last-update timestamp. Bumped on rotation.
    pub updated_at: OffsetDateTime,
}

impl Session {
    /// Creates a new session expiring `ttl` from now. Missing
    /// provenance falls back to [`UNKNOWN_PROVENANCE`].
    #[must_use]
    pub fn new(
        user_id: Uuid,
        refresh_token_hash: String,
        device_info: Option<String>,
        ip_address: Option<String>,
        ttl: Duration,
    ) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: Uuid::new_v4(),
            user_id,
            refresh_token_hash,
            device_info: device_info.unwrap_or_else(|| UNKNOWN_PROVENANCE.to_string()),
            ip_address: ip_address.unwrap_or_else(|| UNKNOWN_PROVENANCE.to_string()),
            expires_at: now + ttl,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns `true` once the registry-layer expiry has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at <= OffsetDateTime::now_utc()
    }

    /// Projects the session into its response-safe form.
    #[must_use]
    pub fn to_info(&self) -> SessionInfo {
        SessionInfo {
            id: self.id,
            device_info: self.device_info.clone(),
            ip_address: self.ip_address.clone(),
            expires_at: self.expires_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// The response-safe projection of a [`Session`]: everything except
/// the refresh-token hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    /// Session identifier, usable as a logout target.
    pub id: Uuid,

    /// Device description captured at login.
    pub device_info: String,

    /// Client address captured at login.
    pub ip_address: String,

    /// Session expiry.
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,

    /// Creation timestamp.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,

    /// Last-update timestamp.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}
