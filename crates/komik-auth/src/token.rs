//! Stateless token signing and verification.
//!
//! Access and refresh tokens are HS256 JWTs carrying the same claim
//! shape but signed with independent secrets and lifetimes. Verifying
//! a refresh token against the access context (or vice versa) fails
//! the signature check, so the two kinds can never be substituted for
//! one another.
//!
//! Verification here covers only the signature layer. Whether a
//! refresh token still corresponds to a live session is decided by the
//! session registry, not by this module.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::config::AuthConfig;
use crate::types::{Role, User};

// ============================================================================
// Claims
// ============================================================================

/// Claims embedded in both access and refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the user id as a string.
    pub sub: String,

    /// Username at issuance time.
    pub username: String,

    /// Role at issuance time.
    pub role: Role,

    /// Issued-at (unix seconds).
    pub iat: i64,

    /// Expiry (unix seconds).
    pub exp: i64,
}

/// A freshly issued access/refresh token pair.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// Short-lived access token.
    pub access_token: String,

    /// Long-lived refresh token. The plaintext exists only in this
    /// response; storage keeps a salted hash.
    pub refresh_token: String,
}

// ============================================================================
// Errors
// ============================================================================

/// Token verification failures.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// The token's `exp` claim is in the past.
    #[error("token expired")]
    Expired,

    /// The signature does not verify against the expected secret.
    #[error("invalid token signature")]
    InvalidSignature,

    /// The token is structurally invalid or its claims cannot be
    /// deserialized.
    #[error("malformed token: {message}")]
    Malformed {
        /// Description of the defect.
        message: String,
    },
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            _ => Self::Malformed {
                message: err.to_string(),
            },
        }
    }
}

// ============================================================================
// Service
// ============================================================================

/// One signing context: a keypair derived from a symmetric secret plus
/// the lifetime tokens signed with it receive.
struct SigningContext {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: time::Duration,
}

impl SigningContext {
    fn new(secret: &str, ttl: time::Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    fn sign(&self, user: &User) -> Result<String, TokenError> {
        let now = OffsetDateTime::now_utc();
        let claims = TokenClaims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            role: user.role,
            iat: now.unix_timestamp(),
            exp: (now + self.ttl).unix_timestamp(),
        };
        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding).map_err(TokenError::from)
    }

    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding, &validation)?;
        Ok(data.claims)
    }
}

/// Signs and verifies access and refresh tokens.
pub struct TokenService {
    access: SigningContext,
    refresh: SigningContext,
}

impl TokenService {
    /// Creates a token service from the configured secrets and TTLs.
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            access: SigningContext::new(&config.access_secret, config.access_ttl),
            refresh: SigningContext::new(&config.refresh_secret, config.refresh_ttl),
        }
    }

    /// Issues a fresh access/refresh pair for the user's current state.
    ///
    /// Claims are snapshotted at issuance: a later role change takes
    /// effect on the next rotation, not retroactively.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Malformed`] if signing fails.
    pub fn issue_pair(&self, user: &User) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access_token: self.access.sign(user)?,
            refresh_token: self.refresh.sign(user)?,
        })
    }

    /// Verifies an access token's signature and expiry.
    ///
    /// # Errors
    ///
    /// Returns the corresponding [`TokenError`] if the token is
    /// expired, forged, or malformed.
    pub fn verify_access(&self, token: &str) -> Result<TokenClaims, TokenError> {
        self.access.verify(token)
    }

    /// Verifies a refresh token's signature and expiry.
    ///
    /// # Errors
    ///
    /// Returns the corresponding [`TokenError`] if the token is
    /// expired, forged, or malformed.
    pub fn verify_refresh(&self, token: &str) -> Result<TokenClaims, TokenError> {
        self.refresh.verify(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn test_user() -> User {
        User::new(
            "reader".to_string(),
            "reader@example.com".to_string(),
            "Reader One".to_string(),
            "$argon2id$unused".to_string(),
            Role::User,
        )
    }

    fn test_service() -> TokenService {
        TokenService::new(&AuthConfig::new("access-secret", "refresh-secret"))
    }

    #[test]
    fn test_issue_and_verify_pair() {
        let service = test_service();
        let user = test_user();

        let pair = service.issue_pair(&user).unwrap();

        let access = service.verify_access(&pair.access_token).unwrap();
        assert_eq!(access.sub, user.id.to_string());
        assert_eq!(access.username, "reader");
        assert_eq!(access.role, Role::User);

        let refresh = service.verify_refresh(&pair.refresh_token).unwrap();
        assert_eq!(refresh.sub, user.id.to_string());
        assert!(refresh.exp > access.exp, "refresh outlives access");
    }

    #[test]
    fn test_tokens_are_not_interchangeable() {
        let service = test_service();
        let pair = service.issue_pair(&test_user()).unwrap();

        assert!(matches!(
            service.verify_access(&pair.refresh_token),
            Err(TokenError::InvalidSignature)
        ));
        assert!(matches!(
            service.verify_refresh(&pair.access_token),
            Err(TokenError::InvalidSignature)
        ));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let service = test_service();
        let pair = service.issue_pair(&test_user()).unwrap();

        let mut tampered = pair.access_token.clone();
        tampered.truncate(tampered.len() - 4);
        tampered.push_str("AAAA");

        assert!(service.verify_access(&tampered).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuing = test_service();
        let other = TokenService::new(&AuthConfig::new("different", "secrets"));

        let pair = issuing.issue_pair(&test_user()).unwrap();
        assert!(matches!(
            other.verify_access(&pair.access_token),
            Err(TokenError::InvalidSignature)
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        // TTL far enough in the past to clear the default 60s leeway.
        let config = AuthConfig::new("access-secret", "refresh-secret")
            .with_access_ttl(time::Duration::seconds(-120));
        let service = TokenService::new(&config);

        let pair = service.issue_pair(&test_user()).unwrap();
        assert!(matches!(
            service.verify_access(&pair.access_token),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn test_malformed_token_rejected() {
        let service = test_service();
        assert!(matches!(
            service.verify_access("not.a.jwt"),
            Err(TokenError::Malformed { .. })
        ));
    }

    #[test]
    fn test_claims_subject_parses_as_uuid() {
        let service = test_service();
        let user = test_user();
        let pair = service.issue_pair(&user).unwrap();

        let claims = service.verify_access(&pair.access_token).unwrap();
        assert_eq!(Uuid::parse_str(&claims.sub).unwrap(), user.id);
    }
}
