//! Shared application state.

use std::sync::Arc;

use axum::extract::FromRef;
use komik_auth::middleware::{AuthState, PolicyTable};
use komik_auth::{AuthConfig, AuthService, TokenService};
use komik_auth::storage::{SessionStorage, UserStorage};

use crate::policy::POLICIES;

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The auth orchestrator.
    pub auth_service: Arc<AuthService>,

    /// State for the bearer-token extractor.
    pub auth: AuthState,

    /// The operation policy table.
    pub policies: PolicyTable,
}

impl AppState {
    /// Wires the application state from its parts.
    #[must_use]
    pub fn new(
        users: Arc<dyn UserStorage>,
        sessions: Arc<dyn SessionStorage>,
        config: &AuthConfig,
    ) -> Self {
        let tokens = Arc::new(TokenService::new(config));
        let auth_service = Arc::new(AuthService::new(
            users,
            sessions,
            Arc::clone(&tokens),
            config,
        ));
        Self {
            auth_service,
            auth: AuthState::new(tokens),
            policies: POLICIES,
        }
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}
