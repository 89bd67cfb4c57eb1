use chrono::Duration;
use sqlx::postgres::PgConnectOptions;
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use thiserror::Error;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::create_security_headers_layer;

const DEFAULT_DB_HOST: &str = "localhost";
const DEFAULT_DB_PORT: u16 = 5432;
const DEFAULT_DB_NAME: &str = "webbeep";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3001";
const DEFAULT_SESSION_TTL_SECS: i64 = 24 * 60 * 60;
const MAX_SESSION_TTL_SECS: i64 = 365 * 24 * 60 * 60;
const DEFAULT_CORS_ALLOWED_ORIGINS: &str = "http://localhost:3001";
const BCRYPT_COST_RANGE: std::ops::RangeInclusive<u32> = 4..=31;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} '{value}' is invalid: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("DATABASE_URL is invalid: {0}")]
    DatabaseUrl(#[from] sqlx::Error),
}

impl ConfigError {
    fn invalid(key: &'static str, value: impl ToString, reason: impl ToString) -> Self {
        ConfigError::Invalid {
            key,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseSettings {
    /// A full `DATABASE_URL`.
    Url(String),
    /// Individual connection parameters.
    Parts {
        host: String,
        port: u16,
        database: String,
        user: Option<String>,
        password: Option<String>,
    },
}

impl DatabaseSettings {
    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        match self {
            DatabaseSettings::Url(url) => Ok(PgConnectOptions::from_str(url)?),
            DatabaseSettings::Parts {
                host,
                port,
                database,
                user,
                password,
            } => {
                let mut options = PgConnectOptions::new()
                    .host(host)
                    .port(*port)
                    .database(database);
                if let Some(user) = user {
                    options = options.username(user);
                }
                if let Some(password) = password {
                    options = options.password(password);
                }
                Ok(options)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseSettings,
    pub max_connections: u32,
    pub bind_addr: SocketAddr,
    pub session_ttl: Duration,
    pub bcrypt_cost: u32,
    pub production: bool,
    /// Raw comma-separated `CORS_ALLOWED_ORIGINS`.
    pub cors_allowed_origins: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database = match non_empty("DATABASE_URL") {
            Some(url) => DatabaseSettings::Url(url),
            None => DatabaseSettings::Parts {
                host: non_empty("DB_HOST").unwrap_or_else(|| DEFAULT_DB_HOST.to_string()),
                port: parse_or("DB_PORT", non_empty("DB_PORT"), DEFAULT_DB_PORT)?,
                database: non_empty("DB_NAME").unwrap_or_else(|| DEFAULT_DB_NAME.to_string()),
                user: non_empty("DB_USER"),
                password: lookup("DB_PASSWORD"),
            },
        };

        let bind_addr = non_empty("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr
            .parse()
            .map_err(|e| ConfigError::invalid("BIND_ADDR", &bind_addr, e))?;

        let ttl_secs = parse_or(
            "SESSION_TTL_SECS",
            non_empty("SESSION_TTL_SECS"),
            DEFAULT_SESSION_TTL_SECS,
        )?;
        if !(1..=MAX_SESSION_TTL_SECS).contains(&ttl_secs) {
            return Err(ConfigError::invalid(
                "SESSION_TTL_SECS",
                ttl_secs,
                format!("must be between 1 and {}", MAX_SESSION_TTL_SECS),
            ));
        }
        let session_ttl = Duration::try_seconds(ttl_secs)
            .ok_or_else(|| ConfigError::invalid("SESSION_TTL_SECS", ttl_secs, "out of range"))?;

        let bcrypt_cost = parse_or("BCRYPT_COST", non_empty("BCRYPT_COST"), bcrypt::DEFAULT_COST)?;
        if !BCRYPT_COST_RANGE.contains(&bcrypt_cost) {
            return Err(ConfigError::invalid(
                "BCRYPT_COST",
                bcrypt_cost,
                "must be between 4 and 31",
            ));
        }

        Ok(Self {
            database,
            max_connections: parse_or(
                "DB_MAX_CONNECTIONS",
                non_empty("DB_MAX_CONNECTIONS"),
                DEFAULT_MAX_CONNECTIONS,
            )?,
            bind_addr,
            session_ttl,
            bcrypt_cost,
            production: lookup("RUST_ENV")
                .map(|v| v.to_lowercase() == "production")
                .unwrap_or(false),
            cors_allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|| DEFAULT_CORS_ALLOWED_ORIGINS.to_string()),
        })
    }
}

fn parse_or<T>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ConfigError::invalid(key, &raw, e)),
        None => Ok(default),
    }
}
