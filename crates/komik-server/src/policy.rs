//! The server's operation policy table.
//!
//! Every routed operation appears here, so the full access surface can
//! be read in one place. Handlers consult the table through
//! [`PolicyTable::authorize`] before doing any work.

use komik_auth::middleware::{OperationPolicy, PolicyTable};

/// Registration, open to anyone.
pub const AUTH_REGISTER: &str = "auth.register";
/// Credential login, open to anyone.
pub const AUTH_LOGIN: &str = "auth.login";
/// Refresh-token rotation. Authenticated by the refresh token itself.
pub const AUTH_REFRESH: &str = "auth.refresh";
/// End one session.
pub const AUTH_LOGOUT: &str = "auth.logout";
/// End all sessions.
pub const AUTH_LOGOUT_ALL: &str = "auth.logout_all";
/// List the caller's sessions.
pub const AUTH_SESSIONS: &str = "auth.sessions";
/// The caller's profile.
pub const AUTH_PROFILE: &str = "auth.profile";

/// The deployed policy table.
pub const POLICIES: PolicyTable = PolicyTable::new(&[
    OperationPolicy::public(AUTH_REGISTER),
    OperationPolicy::public(AUTH_LOGIN),
    OperationPolicy::public(AUTH_REFRESH),
    OperationPolicy::authenticated(AUTH_LOGOUT),
    OperationPolicy::authenticated(AUTH_LOGOUT_ALL),
    OperationPolicy::authenticated(AUTH_SESSIONS),
    OperationPolicy::authenticated(AUTH_PROFILE),
]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_operation_is_registered() {
        for op in [
            AUTH_REGISTER,
            AUTH_LOGIN,
            AUTH_REFRESH,
            AUTH_LOGOUT,
            AUTH_LOGOUT_ALL,
            AUTH_SESSIONS,
            AUTH_PROFILE,
        ] {
            assert!(POLICIES.policy(op).is_some(), "missing policy for {op}");
        }
    }

    #[test]
    fn test_session_operations_require_auth() {
        for op in [AUTH_LOGOUT, AUTH_LOGOUT_ALL, AUTH_SESSIONS, AUTH_PROFILE] {
            assert!(POLICIES.authorize(op, None).is_err(), "{op} open to anonymous");
        }
    }
}
