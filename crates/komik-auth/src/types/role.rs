//! User roles.

use serde::{Deserialize, Serialize};

/// Authorization role attached to every user.
///
/// Serialized in SCREAMING_SNAKE_CASE to match the stored column
/// values and the token claims.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Administrative access to management operations.
    Admin,

    /// Regular user. The default for new registrations.
    #[default]
    User,
}

impl Role {
    /// Returns the canonical string form.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::User => "USER",
        }
    }

    /// Parses the canonical string form. Returns `None` for anything
    /// else.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ADMIN" => Some(Self::Admin),
            "USER" => Some(Self::User),
            _ => None,
        }
    }

    /// Returns `true` for [`Role::Admin`].
    #[must_use]
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
