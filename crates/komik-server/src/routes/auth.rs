//! Authentication routes.
//!
//! Thin handlers: each consults the policy table, extracts what the
//! request carries, and delegates to the auth service. Response bodies
//! use the shared envelope.

use axum::{
    Json, Router,
    extract::State,
    http::HeaderMap,
    routing::{get, post},
};
use komik_auth::error::AuthResult;
use komik_auth::middleware::BearerAuth;
use komik_auth::service::{LoginRequest, Provenance, RegisterRequest};
use komik_auth::token::TokenPair;
use komik_auth::types::{PublicUser, SessionInfo};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::policy;
use crate::response::ApiResponse;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/logout", post(logout))
        .route("/logout-all", post(logout_all))
        .route("/sessions", get(sessions))
        .route("/me", get(profile))
}

// ============================================================================
// Request and response bodies
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshBody {
    refresh_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LogoutBody {
    session_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginData {
    user: PublicUser,
    #[serde(flatten)]
    tokens: TokenPair,
}

#[derive(Debug, Serialize)]
struct LogoutAllData {
    count: u64,
}

// ============================================================================
// Handlers
// ============================================================================

async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> AuthResult<ApiResponse<PublicUser>> {
    state.policies.authorize(policy::AUTH_REGISTER, None)?;
    let user = state.auth_service.register(body).await?;
    Ok(ApiResponse::created("User registered successfully", user))
}

async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<LoginRequest>,
) -> AuthResult<ApiResponse<LoginData>> {
    state.policies.authorize(policy::AUTH_LOGIN, None)?;
    let provenance = provenance_from_headers(&headers);
    let (user, tokens) = state.auth_service.login(body, provenance).await?;
    Ok(ApiResponse::ok("Login successful", LoginData { user, tokens }))
}

async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshBody>,
) -> AuthResult<ApiResponse<TokenPair>> {
    state.policies.authorize(policy::AUTH_REFRESH, None)?;
    let pair = state.auth_service.refresh(&body.refresh_token).await?;
    Ok(ApiResponse::ok("Token refreshed successfully", pair))
}

async fn logout(
    State(state): State<AppState>,
    BearerAuth(principal): BearerAuth,
    body: Option<Json<LogoutBody>>,
) -> AuthResult<ApiResponse<()>> {
    state
        .policies
        .authorize(policy::AUTH_LOGOUT, Some(&principal))?;
    let session_id = body.and_then(|Json(b)| b.session_id);
    state.auth_service.logout(principal.user_id, session_id).await?;
    Ok(ApiResponse::message("Logged out successfully"))
}

async fn logout_all(
    State(state): State<AppState>,
    BearerAuth(principal): BearerAuth,
) -> AuthResult<ApiResponse<LogoutAllData>> {
    state
        .policies
        .authorize(policy::AUTH_LOGOUT_ALL, Some(&principal))?;
    let count = state.auth_service.logout_all(principal.user_id).await?;
    Ok(ApiResponse::ok(
        "Logged out from all devices",
        LogoutAllData { count },
    ))
}

async fn sessions(
    State(state): State<AppState>,
    BearerAuth(principal): BearerAuth,
) -> AuthResult<ApiResponse<Vec<SessionInfo>>> {
    state
        .policies
        .authorize(policy::AUTH_SESSIONS, Some(&principal))?;
    let sessions = state.auth_service.sessions(principal.user_id).await?;
    Ok(ApiResponse::ok("Sessions retrieved successfully", sessions))
}

async fn profile(
    State(state): State<AppState>,
    BearerAuth(principal): BearerAuth,
) -> AuthResult<ApiResponse<PublicUser>> {
    state
        .policies
        .authorize(policy::AUTH_PROFILE, Some(&principal))?;
    let user = state.auth_service.profile(principal.user_id).await?;
    Ok(ApiResponse::ok("Profile retrieved successfully", user))
}

/// Captures device and address metadata from request headers. Proxies
/// may stack addresses in X-Forwarded-For; the first entry is the
/// client.
fn provenance_from_headers(headers: &HeaderMap) -> Provenance {
    let device_info = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);
    let ip_address = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    Provenance {
        device_info,
        ip_address,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_provenance_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("user-agent", HeaderValue::from_static("Firefox"));
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );

        let p = provenance_from_headers(&headers);
        assert_eq!(p.device_info.as_deref(), Some("Firefox"));
        assert_eq!(p.ip_address.as_deref(), Some("203.0.113.9"));
    }

    #[test]
    fn test_provenance_missing_headers() {
        let p = provenance_from_headers(&HeaderMap::new());
        assert!(p.device_info.is_none());
        assert!(p.ip_address.is_none());
    }
}
