//! Bearer token authentication extractor.
//!
//! The extractor verifies the access token's signature and expiry and
//! yields the [`Principal`] carried in its claims. There is no storage
//! round trip: the claims are the identity, so access checks stay
//! stateless and revocation happens at the refresh boundary.
//!
//! # Example
//!
//! ```ignore
//! use komik_auth::middleware::BearerAuth;
//!
//! async fn protected_handler(BearerAuth(principal): BearerAuth) -> String {
//!     format!("Hello, {}!", principal.username)
//! }
//! ```

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::AuthError;
use crate::token::TokenService;
use crate::types::Principal;

/// State required for bearer token authentication.
///
/// Include this in the application state and expose it to the
/// extractor via `FromRef`.
#[derive(Clone)]
pub struct AuthState {
    /// Token service for access-token verification.
    pub tokens: Arc<TokenService>,
}

impl AuthState {
    /// Creates a new auth state.
    #[must_use]
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }
}

/// Axum extractor that validates the `Authorization: Bearer` header
/// and yields the authenticated [`Principal`].
///
/// # Errors
///
/// Rejects with `AuthError` (which implements `IntoResponse`) if the
/// header is missing or malformed, or the token is invalid or expired.
pub struct BearerAuth(pub Principal);

impl<S> FromRequestParts<S> for BearerAuth
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| AuthError::unauthorized("Missing Authorization header"))?;

        let token = header
            .strip_prefix("Bearer ")
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AuthError::unauthorized("Invalid Authorization header"))?;

        let claims = auth_state.tokens.verify_access(token).map_err(|e| {
            tracing::debug!(error = %e, "access token rejected");
            AuthError::unauthorized("Invalid or expired access token")
        })?;

        let principal = Principal::from_claims(&claims)?;
        Ok(BearerAuth(principal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;
    use crate::types::{Role, User};
    use axum::http::Request;

    #[derive(Clone)]
    struct TestState {
        auth: AuthState,
    }

    impl FromRef<TestState> for AuthState {
        fn from_ref(state: &TestState) -> Self {
            state.auth.clone()
        }
    }

    fn state() -> TestState {
        let tokens = Arc::new(TokenService::new(&AuthConfig::new("access", "refresh")));
        TestState {
            auth: AuthState::new(tokens),
        }
    }

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/profile");
        if let Some(v) = value {
            builder = builder.header(AUTHORIZATION, v);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn test_valid_bearer_token() {
        let state = state();
        let user = User::new(
            "reader".to_string(),
            "r@example.com".to_string(),
            "Reader".to_string(),
            "hash".to_string(),
            Role::User,
        );
        let pair = state.auth.tokens.issue_pair(&user).unwrap();

        let mut parts = parts_with_auth(Some(&format!("Bearer {}", pair.access_token)));
        let BearerAuth(principal) = BearerAuth::from_request_parts(&mut parts, &state)
            .await
            .unwrap();

        assert_eq!(principal.user_id, user.id);
        assert_eq!(principal.username, "reader");
    }

    #[tokio::test]
    async fn test_missing_and_malformed_headers() {
        let state = state();

        let mut parts = parts_with_auth(None);
        assert!(matches!(
            BearerAuth::from_request_parts(&mut parts, &state).await,
            Err(AuthError::Unauthorized { .. })
        ));

        let mut parts = parts_with_auth(Some("Basic dXNlcjpwYXNz"));
        assert!(matches!(
            BearerAuth::from_request_parts(&mut parts, &state).await,
            Err(AuthError::Unauthorized { .. })
        ));

        let mut parts = parts_with_auth(Some("Bearer "));
        assert!(matches!(
            BearerAuth::from_request_parts(&mut parts, &state).await,
            Err(AuthError::Unauthorized { .. })
        ));
    }

    #[tokio::test]
    async fn test_refresh_token_is_not_an_access_token() {
        let state = state();
        let user = User::new(
            "reader".to_string(),
            "r@example.com".to_string(),
            "Reader".to_string(),
            "hash".to_string(),
            Role::User,
        );
        let pair = state.auth.tokens.issue_pair(&user).unwrap();

        let mut parts = parts_with_auth(Some(&format!("Bearer {}", pair.refresh_token)));
        assert!(matches!(
            BearerAuth::from_request_parts(&mut parts, &state).await,
            Err(AuthError::Unauthorized { .. })
        ));
    }
}
