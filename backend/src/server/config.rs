//! Server settings loaded via OrthoConfig.
//!
//! Values come from `MEALBOOK_*` environment variables, CLI flags, and an
//! optional configuration file, in increasing precedence.

use std::net::SocketAddr;

use chrono::TimeDelta;
use ortho_config::OrthoConfig;
use serde::Deserialize;

use mealbook::domain::DEFAULT_REFRESH_TOKEN_TTL_DAYS;
use mealbook::outbound::security::{DEFAULT_ACCESS_TOKEN_TTL_SECS, DEFAULT_JWT_ISSUER};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;

/// Settings that cannot be turned into a running server.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// `MEALBOOK_DATABASE_URL` was not provided.
    #[error("database_url is required")]
    MissingDatabaseUrl,
    /// `MEALBOOK_JWT_SECRET` was not provided or is blank.
    #[error("jwt_secret is required")]
    MissingJwtSecret,
    /// The bind address did not parse.
    #[error("invalid bind_addr {value:?}: {message}")]
    InvalidBindAddr { value: String, message: String },
    /// A lifetime was zero or too large to represent.
    #[error("{field} must be a positive duration")]
    InvalidLifetime { field: &'static str },
}

/// Configuration values for the HTTP server and its adapters.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MEALBOOK")]
pub struct ServerSettings {
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// HMAC secret for access tokens.
    pub jwt_secret: Option<String>,
    /// Issuer claim written to and required on access tokens.
    pub jwt_issuer: Option<String>,
    /// Access token lifetime in seconds.
    pub access_token_ttl_secs: Option<i64>,
    /// Refresh token lifetime in days.
    pub refresh_token_ttl_days: Option<i64>,
    /// Maximum database connections.
    pub pool_max_size: Option<u32>,
    /// Apply pending migrations before serving.
    #[ortho_config(default = true)]
    pub run_migrations: bool,
}

impl ServerSettings {
    /// Configured database URL.
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    /// Configured signing secret.
    pub fn jwt_secret(&self) -> Result<&str, SettingsError> {
        self.jwt_secret
            .as_deref()
            .filter(|secret| !secret.trim().is_empty())
            .ok_or(SettingsError::MissingJwtSecret)
    }

    /// Listen address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| {
            SettingsError::InvalidBindAddr {
                value: raw.to_owned(),
                message: err.to_string(),
            }
        })
    }

    /// Issuer claim, falling back to the default issuer.
    pub fn jwt_issuer(&self) -> &str {
        self.jwt_issuer.as_deref().unwrap_or(DEFAULT_JWT_ISSUER)
    }

    /// Access token lifetime.
    pub fn access_token_ttl(&self) -> Result<TimeDelta, SettingsError> {
        positive(
            self.access_token_ttl_secs
                .unwrap_or(DEFAULT_ACCESS_TOKEN_TTL_SECS),
            TimeDelta::try_seconds,
            "access_token_ttl_secs",
        )
    }

    /// Refresh token lifetime.
    pub fn refresh_token_ttl(&self) -> Result<TimeDelta, SettingsError> {
        positive(
            self.refresh_token_ttl_days
                .unwrap_or(DEFAULT_REFRESH_TOKEN_TTL_DAYS),
            TimeDelta::try_days,
            "refresh_token_ttl_days",
        )
    }

    /// Pool size, falling back to ten connections.
    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE).max(1)
    }
}

fn positive(
    value: i64,
    to_delta: fn(i64) -> Option<TimeDelta>,
    field: &'static str,
) -> Result<TimeDelta, SettingsError> {
    if value <= 0 {
        return Err(SettingsError::InvalidLifetime { field });
    }
    to_delta(value).ok_or(SettingsError::InvalidLifetime { field })
}

#[cfg(test)]
mod tests {
    //! Unit tests for server settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 8] = [
        "MEALBOOK_DATABASE_URL",
        "MEALBOOK_BIND_ADDR",
        "MEALBOOK_JWT_SECRET",
        "MEALBOOK_JWT_ISSUER",
        "MEALBOOK_ACCESS_TOKEN_TTL_SECS",
        "MEALBOOK_REFRESH_TOKEN_TTL_DAYS",
        "MEALBOOK_POOL_MAX_SIZE",
        "MEALBOOK_RUN_MIGRATIONS",
    ];

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("mealbook")])
            .expect("config should load")
    }

    fn env_with(overrides: &[(&str, &str)]) -> Vec<(&'static str, Option<String>)> {
        VARS.iter()
            .map(|name| {
                let value = overrides
                    .iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| (*value).to_owned());
                (*name, value)
            })
            .collect()
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(env_with(&[]));

        let settings = load_from_empty_args();
        assert_eq!(settings.database_url(), Err(SettingsError::MissingDatabaseUrl));
        assert_eq!(settings.jwt_secret(), Err(SettingsError::MissingJwtSecret));
        assert_eq!(
            settings.bind_addr(),
            Ok("0.0.0.0:8080".parse().expect("addr"))
        );
        assert_eq!(settings.jwt_issuer(), "meal_planner");
        assert_eq!(settings.access_token_ttl(), Ok(TimeDelta::hours(1)));
        assert_eq!(settings.refresh_token_ttl(), Ok(TimeDelta::days(60)));
        assert_eq!(settings.pool_max_size(), 10);
        assert!(settings.run_migrations);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(env_with(&[
            ("MEALBOOK_DATABASE_URL", "postgres://cook@db/mealbook"),
            ("MEALBOOK_BIND_ADDR", "127.0.0.1:9000"),
            ("MEALBOOK_JWT_SECRET", "s3cret"),
            ("MEALBOOK_JWT_ISSUER", "kitchen"),
            ("MEALBOOK_ACCESS_TOKEN_TTL_SECS", "120"),
            ("MEALBOOK_REFRESH_TOKEN_TTL_DAYS", "7"),
            ("MEALBOOK_POOL_MAX_SIZE", "4"),
            ("MEALBOOK_RUN_MIGRATIONS", "false"),
        ]));

        let settings = load_from_empty_args();
        assert_eq!(settings.database_url(), Ok("postgres://cook@db/mealbook"));
        assert_eq!(settings.jwt_secret(), Ok("s3cret"));
        assert_eq!(
            settings.bind_addr(),
            Ok("127.0.0.1:9000".parse().expect("addr"))
        );
        assert_eq!(settings.jwt_issuer(), "kitchen");
        assert_eq!(settings.access_token_ttl(), Ok(TimeDelta::minutes(2)));
        assert_eq!(settings.refresh_token_ttl(), Ok(TimeDelta::days(7)));
        assert_eq!(settings.pool_max_size(), 4);
        assert!(!settings.run_migrations);
    }

    #[rstest]
    #[case("MEALBOOK_ACCESS_TOKEN_TTL_SECS", "0", "access_token_ttl_secs")]
    #[case("MEALBOOK_REFRESH_TOKEN_TTL_DAYS", "-3", "refresh_token_ttl_days")]
    fn non_positive_lifetimes_are_rejected(
        #[case] var: &str,
        #[case] value: &str,
        #[case] field: &'static str,
    ) {
        let _guard = lock_env(env_with(&[(var, value)]));

        let settings = load_from_empty_args();
        let result = if field == "access_token_ttl_secs" {
            settings.access_token_ttl()
        } else {
            settings.refresh_token_ttl()
        };
        assert_eq!(result, Err(SettingsError::InvalidLifetime { field }));
    }

    #[rstest]
    fn malformed_bind_addr_is_reported() {
        let _guard = lock_env(env_with(&[("MEALBOOK_BIND_ADDR", "not an address")]));

        let settings = load_from_empty_args();
        assert!(matches!(
            settings.bind_addr(),
            Err(SettingsError::InvalidBindAddr { .. })
        ));
    }
}
