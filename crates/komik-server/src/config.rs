//! Server configuration from environment variables.

use komik_auth::AuthConfig;

/// Configuration errors raised at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is unset.
    #[error("missing required environment variable {name}")]
    MissingVar {
        /// Variable name.
        name: &'static str,
    },

    /// An environment variable has an unparseable value.
    #[error("invalid value for {name}: {message}")]
    InvalidVar {
        /// Variable name.
        name: &'static str,
        /// Description of the defect.
        message: String,
    },
}

/// Full server configuration, assembled once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen port. `PORT`, default 4000.
    pub port: u16,

    /// PostgreSQL connection URL. `DATABASE_URL`, required.
    pub database_url: String,

    /// Connection pool size. `DATABASE_MAX_CONNECTIONS`, default 5.
    pub max_connections: u32,

    /// Log level when `RUST_LOG` is unset. `LOG_LEVEL`, default `info`.
    pub log_level: String,

    /// Token secrets and lifetimes. `JWT_SECRET` and
    /// `JWT_REFRESH_SECRET`, both required.
    pub auth: AuthConfig,
}

impl ServerConfig {
    /// Loads configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a required variable is missing or a
    /// numeric variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let access_secret = require("JWT_SECRET")?;
        let refresh_secret = require("JWT_REFRESH_SECRET")?;

        Ok(Self {
            port: parse_or("PORT", 4000)?,
            database_url: require("DATABASE_URL")?,
            max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 5)?,
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            auth: AuthConfig::new(access_secret, refresh_secret),
        })
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingVar { name })
}

fn parse_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw.parse().map_err(|e: T::Err| ConfigError::InvalidVar {
            name,
            message: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env-var tests mutate process state, so everything runs in one
    // test to avoid interference.
    #[test]
    fn test_from_env() {
        unsafe {
            std::env::remove_var("JWT_SECRET");
            std::env::remove_var("JWT_REFRESH_SECRET");
            std::env::remove_var("DATABASE_URL");
            std::env::remove_var("PORT");
            std::env::remove_var("DATABASE_MAX_CONNECTIONS");
            std::env::remove_var("LOG_LEVEL");
        }

        assert!(matches!(
            ServerConfig::from_env(),
            Err(ConfigError::MissingVar { name: "JWT_SECRET" })
        ));

        unsafe {
            std::env::set_var("JWT_SECRET", "access");
            std::env::set_var("JWT_REFRESH_SECRET", "refresh");
            std::env::set_var("DATABASE_URL", "postgres://localhost/komik");
        }

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.port, 4000);
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.auth.access_secret, "access");

        unsafe {
            std::env::set_var("PORT", "not-a-port");
        }
        assert!(matches!(
            ServerConfig::from_env(),
            Err(ConfigError::InvalidVar { name: "PORT", .. })
        ));

        unsafe {
            std::env::set_var("PORT", "8080");
        }
        assert_eq!(ServerConfig::from_env().unwrap().port, 8080);
    }
}
