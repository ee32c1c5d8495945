//! API server configuration.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use pact_core::auth::jwt::SigningKeys;
use pact_core::auth::password::{DEFAULT_BCRYPT_COST, MAX_BCRYPT_COST, MIN_BCRYPT_COST};
use thiserror::Error;
use tracing::warn;

const DEV_ACCESS_TOKEN_SECRET: &str = "pact-dev-access-secret-change-in-production";
const DEV_REFRESH_TOKEN_SECRET: &str = "pact-dev-refresh-secret-change-in-production";
const DEVELOPMENT: &str = "development";

/// Configuration errors. The server refuses to start on any of these.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set when APP_ENV is not 'development'")]
    MissingSecret(&'static str),

    #[error("ACCESS_TOKEN_SECRET and REFRESH_TOKEN_SECRET must differ")]
    SharedSecret,

    #[error("invalid value for {var}: '{value}'")]
    Invalid { var: &'static str, value: String },
}

/// How the access gate treats matched routes other than login and health.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateMode {
    /// Reject every protected route. There is no admission path for
    /// authenticated callers in this mode.
    Locked,
    /// Admit callers presenting a valid, stored, unexpired access token.
    Bearer,
}

impl FromStr for GateMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "locked" => Ok(GateMode::Locked),
            "bearer" => Ok(GateMode::Bearer),
            _ => Err(()),
        }
    }
}

/// Configuration for the API server.
#[derive(Clone)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:8080").
    pub bind_addr: String,
    /// PostgreSQL connection URL.
    pub pg_connection_url: String,
    /// Deployment environment name; only "development" accepts default secrets.
    pub environment: String,
    /// HS256 secret for access tokens.
    pub access_token_secret: String,
    /// HS256 secret for refresh tokens.
    pub refresh_token_secret: String,
    /// bcrypt work factor for newly hashed passwords.
    pub bcrypt_cost: u32,
    pub gate_mode: GateMode,
    /// Upper bound on each store round trip.
    pub store_timeout: Duration,
}

impl ApiConfig {
    /// Reads configuration from environment variables with development defaults.
    ///
    /// | Variable               | Default                          |
    /// |------------------------|----------------------------------|
    /// | `BIND_ADDR`            | `127.0.0.1:8080`                 |
    /// | `DATABASE_URL`         | `postgres://localhost:5432/pact` |
    /// | `APP_ENV`              | `development`                    |
    /// | `ACCESS_TOKEN_SECRET`  | dev secret (development only)    |
    /// | `REFRESH_TOKEN_SECRET` | dev secret (development only)    |
    /// | `BCRYPT_COST`          | `10`                             |
    /// | `ACCESS_GATE_MODE`     | `locked`                         |
    /// | `STORE_TIMEOUT_MS`     | `5000`                           |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ApiConfig::from_env`], reading values through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = var("APP_ENV").unwrap_or_else(|| DEVELOPMENT.into());
        let development = environment == DEVELOPMENT;

        let access_token_secret = resolve_secret(
            var("ACCESS_TOKEN_SECRET"),
            "ACCESS_TOKEN_SECRET",
            DEV_ACCESS_TOKEN_SECRET,
            development,
        )?;
        let refresh_token_secret = resolve_secret(
            var("REFRESH_TOKEN_SECRET"),
            "REFRESH_TOKEN_SECRET",
            DEV_REFRESH_TOKEN_SECRET,
            development,
        )?;
        if access_token_secret == refresh_token_secret {
            return Err(ConfigError::SharedSecret);
        }

        let bcrypt_cost = match var("BCRYPT_COST") {
            None => DEFAULT_BCRYPT_COST,
            Some(raw) => {
                let cost: u32 = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                    var: "BCRYPT_COST",
                    value: raw.clone(),
                })?;
                let clamped = cost.clamp(MIN_BCRYPT_COST, MAX_BCRYPT_COST);
                if clamped != cost {
                    warn!(requested = cost, using = clamped, "BCRYPT_COST out of range");
                }
                clamped
            }
        };

        let gate_mode = match var("ACCESS_GATE_MODE") {
            None => GateMode::Locked,
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                var: "ACCESS_GATE_MODE",
                value: raw.clone(),
            })?,
        };

        let store_timeout = match var("STORE_TIMEOUT_MS") {
            None => Duration::from_millis(5_000),
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .ok_or(ConfigError::Invalid {
                    var: "STORE_TIMEOUT_MS",
                    value: raw,
                })?,
        };

        Ok(Self {
            bind_addr: var("BIND_ADDR").unwrap_or_else(|| "127.0.0.1:8080".into()),
            pg_connection_url: var("DATABASE_URL")
                .unwrap_or_else(|| "postgres://localhost:5432/pact".into()),
            environment,
            access_token_secret,
            refresh_token_secret,
            bcrypt_cost,
            gate_mode,
            store_timeout,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == DEVELOPMENT
    }

    pub fn signing_keys(&self) -> SigningKeys {
        SigningKeys::new(
            self.access_token_secret.as_bytes(),
            self.refresh_token_secret.as_bytes(),
        )
    }
}

fn resolve_secret(
    value: Option<String>,
    var: &'static str,
    dev_default: &str,
    development: bool,
) -> Result<String, ConfigError> {
    match value {
        Some(secret) => Ok(secret),
        None if development => {
            warn!(
                var,
                "using the built-in development secret; set {var} before deploying"
            );
            Ok(dev_default.to_string())
        }
        None => Err(ConfigError::MissingSecret(var)),
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("bind_addr", &self.bind_addr)
            .field("environment", &self.environment)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("gate_mode", &self.gate_mode)
            .field("store_timeout", &self.store_timeout)
            .finish_non_exhaustive()
    }
}
