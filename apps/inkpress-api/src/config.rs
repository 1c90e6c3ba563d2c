//! Application configuration loaded from environment variables.
//!
//! Fail-fast loading with validation: required variables must be present
//! and valid or startup stops with a clear error. In production mode the
//! known development signing secret is refused outright.

use chrono::Duration;
use inkpress_auth::IssuerConfig;
use std::env;
use std::net::SocketAddr;
use thiserror::Error;

/// Development-only signing secret.
///
/// Accepted with a warning in development; refused in production.
pub const INSECURE_DEV_SECRET: &str = "inkpress-dev-secret-change-me";

/// Application environment mode.
///
/// Controls secret enforcement: development tolerates the insecure default
/// with a warning, production refuses to start with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Production,
}

impl AppEnvironment {
    /// Parse from the `APP_ENV` environment variable value. Defaults to
    /// development when unset or unrecognized.
    pub fn from_env_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "development" | "dev" => Self::Development,
            other => {
                tracing::warn!(
                    value = other,
                    "Unrecognized APP_ENV value, defaulting to development"
                );
                Self::Development
            }
        }
    }

    /// Returns true in production mode.
    #[must_use]
    pub fn is_production(&self) -> bool {
        *self == Self::Production
    }
}

impl std::fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Configuration errors that stop startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {var}: {detail}")]
    Invalid { var: &'static str, detail: String },

    #[error("JWT_SECRET is the development default; set a real secret in production")]
    InsecureSecret,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the server binds to.
    pub bind_addr: SocketAddr,
    /// Shared token signing secret.
    pub jwt_secret: String,
    /// Token validity windows.
    pub issuer: IssuerConfig,
    /// Log filter directive.
    pub log_filter: String,
    /// Environment mode.
    pub environment: AppEnvironment,
}

impl AppConfig {
    /// Load configuration from the environment.
    ///
    /// Variables:
    /// - `APP_ENV` - "development" (default) or "production"
    /// - `BIND_ADDR` - default `127.0.0.1:8080`
    /// - `JWT_SECRET` - required in production; development falls back to
    ///   an insecure default with a warning
    /// - `ACCESS_TTL_MINUTES`, `REFRESH_TTL_DAYS`, `RESET_TTL_HOURS`,
    ///   `VERIFICATION_TTL_HOURS` - token validity overrides
    /// - `MAX_SESSION_HOURS` - absolute session ceiling; unset means
    ///   sessions slide indefinitely through refresh
    /// - `LOG_FILTER` - default `info`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a required variable is missing or a
    /// value does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment =
            AppEnvironment::from_env_str(&env::var("APP_ENV").unwrap_or_default());

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ if environment.is_production() => return Err(ConfigError::Missing("JWT_SECRET")),
            _ => {
                tracing::warn!("JWT_SECRET not set, using the insecure development default");
                INSECURE_DEV_SECRET.to_string()
            }
        };

        if environment.is_production() && jwt_secret == INSECURE_DEV_SECRET {
            return Err(ConfigError::InsecureSecret);
        }

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                var: "BIND_ADDR",
                detail: e.to_string(),
            })?;

        let mut issuer = IssuerConfig::default();
        if let Some(minutes) = parse_optional_int("ACCESS_TTL_MINUTES")? {
            issuer.access_ttl = Duration::minutes(minutes);
        }
        if let Some(days) = parse_optional_int("REFRESH_TTL_DAYS")? {
            issuer.refresh_ttl = Duration::days(days);
        }
        if let Some(hours) = parse_optional_int("RESET_TTL_HOURS")? {
            issuer.reset_ttl = Duration::hours(hours);
        }
        if let Some(hours) = parse_optional_int("VERIFICATION_TTL_HOURS")? {
            issuer.verification_ttl = Duration::hours(hours);
        }
        if let Some(hours) = parse_optional_int("MAX_SESSION_HOURS")? {
            issuer.max_session = Some(Duration::hours(hours));
        }

        let log_filter = env::var("LOG_FILTER").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            bind_addr,
            jwt_secret,
            issuer,
            log_filter,
            environment,
        })
    }
}

fn parse_optional_int(var: &'static str) -> Result<Option<i64>, ConfigError> {
    match env::var(var) {
        Ok(value) if !value.is_empty() => value
            .parse::<i64>()
            .map(Some)
            .map_err(|e| ConfigError::Invalid {
                var,
                detail: e.to_string(),
            }),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_parsing() {
        assert_eq!(
            AppEnvironment::from_env_str("production"),
            AppEnvironment::Production
        );
        assert_eq!(
            AppEnvironment::from_env_str("prod"),
            AppEnvironment::Production
        );
        assert_eq!(
            AppEnvironment::from_env_str("dev"),
            AppEnvironment::Development
        );
        assert_eq!(
            AppEnvironment::from_env_str("anything-else"),
            AppEnvironment::Development
        );
    }

    #[test]
    fn environment_display() {
        assert_eq!(AppEnvironment::Development.to_string(), "development");
        assert_eq!(AppEnvironment::Production.to_string(), "production");
    }
}
