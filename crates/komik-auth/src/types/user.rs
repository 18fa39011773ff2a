//! User account types.

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use super::Role;

/// A stored user account.
///
/// Deliberately not `Serialize`: the password hash must never travel
/// in a response body. Convert to [`PublicUser`] at the API boundary.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique identifier.
    pub id: Uuid,

    /// Unique username.
    pub username: String,

    /// Unique email address.
    pub email: String,

    /// Display name.
    pub name: String,

    /// Argon2id PHC string of the password.
    pub password_hash: String,

    /// Authorization role.
    pub role: Role,

    /// Creation timestamp.
    pub created_at: OffsetDateTime,

    /// Last-update timestamp.
    pub updated_at: OffsetDateTime,
}

impl User {
    /// Creates a new user with a fresh id and current timestamps.
    #[must_use]
    pub fn new(
        username: String,
        email: String,
        name: String,
        password_hash: String,
        role: Role,
    ) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            name,
            password_hash,
            role,
            created_at: now,
            updated_at: now,
        }
    }

    /// Projects the account into its response-safe form.
    #[must_use]
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// The response-safe projection of a [`User`]: everything except the
/// password hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    /// Unique identifier.
    pub id: Uuid,

    /// Unique username.
    pub username: String,

    /// Unique email address.
    pub email: String,

    /// Display name.
    pub name: String,

    /// Authorization role.
    pub role: Role,

    /// Creation timestamp.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,

    /// Last-update timestamp.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_projection_omits_hash() {
        let user = User::new(
            "reader".to_string(),
            "reader@example.com".to_string(),
            "Reader One".to_string(),
            "$argon2id$secret-hash".to_string(),
            Role::User,
        );

        let json = serde_json::to_string(&user.to_public()).unwrap();
        assert!(json.contains("\"username\":\"reader\""));
        assert!(json.contains("\"role\":\"USER\""));
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn test_new_user_has_matching_timestamps() {
        let user = User::new(
            "a".into(),
            "a@b.c".into(),
            "A".into(),
            "h".into(),
            Role::Admin,
        );
        assert_eq!(user.created_at, user.updated_at);
        assert!(user.role.is_admin());
    }
}
