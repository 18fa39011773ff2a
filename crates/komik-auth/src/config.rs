//! Authentication configuration.
//!
//! The configuration is built once at process start and passed by
//! reference into the components that need secrets and lifetimes;
//! nothing in this crate reads configuration from global state.

use time::Duration;

/// Default access-token lifetime: 15 minutes.
pub const DEFAULT_ACCESS_TTL: Duration = Duration::minutes(15);

/// Default refresh-token lifetime: 7 days.
pub const DEFAULT_REFRESH_TTL: Duration = Duration::days(7);

/// Default session-row lifetime: 7 days, refreshed on every rotation.
pub const DEFAULT_SESSION_TTL: Duration = Duration::days(7);

/// Immutable authentication configuration.
///
/// Access and refresh tokens are signed with two independent symmetric
/// secrets so that neither token kind can be replayed in the other's
/// context.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Secret for signing and verifying access tokens.
    pub access_secret: String,

    /// Secret for signing and verifying refresh tokens. Must differ
    /// from `access_secret`.
    pub refresh_secret: String,

    /// Access-token lifetime (signature-layer expiry).
    pub access_ttl: Duration,

    /// Refresh-token lifetime (signature-layer expiry).
    pub refresh_ttl: Duration,

    /// Session-row lifetime. This is the second, revocable expiry layer
    /// enforced by the session registry, independent of the token
    /// signature.
    pub session_ttl: Duration,
}

impl AuthConfig {
    /// Creates a configuration with the default lifetimes.
    #[must_use]
    pub fn new(access_secret: impl Into<String>, refresh_secret: impl Into<String>) -> Self {
        Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
            access_ttl: DEFAULT_ACCESS_TTL,
            refresh_ttl: DEFAULT_REFRESH_TTL,
            session_ttl: DEFAULT_SESSION_TTL,
        }
    }

    /// Overrides the access-token lifetime.
    #[must_use]
    pub fn with_access_ttl(mut self, ttl: Duration) -> Self {
        self.access_ttl = ttl;
        self
    }

    /// Overrides the refresh-token lifetime.
    #[must_use]
    pub fn with_refresh_ttl(mut self, ttl: Duration) -> Self {
        self.refresh_ttl = ttl;
        self
    }

    /// Overrides the session-row lifetime.
    #[must_use]
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuthConfig::new("access", "refresh");
        assert_eq!(config.access_ttl, Duration::minutes(15));
        assert_eq!(config.refresh_ttl, Duration::days(7));
        assert_eq!(config.session_ttl, Duration::days(7));
    }

    #[test]
    fn test_overrides() {
        let config = AuthConfig::new("a", "r")
            .with_access_ttl(Duration::minutes(5))
            .with_refresh_ttl(Duration::days(1))
            .with_session_ttl(Duration::hours(12));

        assert_eq!(config.access_ttl, Duration::minutes(5));
        assert_eq!(config.refresh_ttl, Duration::days(1));
        assert_eq!(config.session_ttl, Duration::hours(12));
    }
}
