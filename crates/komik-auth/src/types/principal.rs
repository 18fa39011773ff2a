//! The authenticated caller.

use uuid::Uuid;

use crate::error::{AuthError, AuthResult};
use crate::token::TokenClaims;
use crate::types::Role;

/// The identity established by a verified access token.
///
/// Built entirely from the token claims; handlers trusting a
/// `Principal` never touch user storage. A role change therefore takes
/// effect when the client next rotates its tokens.
#[derive(Debug, Clone)]
pub struct Principal {
    /// User id from the `sub` claim.
    pub user_id: Uuid,

    /// Username at token issuance.
    pub username: String,

    /// Role at token issuance.
    pub role: Role,
}

impl Principal {
    /// Builds a principal from verified claims.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Unauthorized`] if the `sub` claim is not a
    /// valid UUID. A token we signed always carries one, so this only
    /// fires for claims that were never ours.
    pub fn from_claims(claims: &TokenClaims) -> AuthResult<Self> {
        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AuthError::unauthorized("Invalid access token"))?;
        Ok(Self {
            user_id,
            username: claims.username.clone(),
            role: claims.role,
        })
    }
}
