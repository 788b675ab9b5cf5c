//! API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;
use std::str::FromStr;

/// Development signing secret, used only when `JWT_SECRET` is unset.
pub const DEV_JWT_SECRET: &str = "stockroom-dev-secret-change-in-production";

/// Log output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(()),
        }
    }
}

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// HTTP listen port
    pub port: u16,

    /// HTTP listen address
    pub bind_addr: String,

    /// SQLite database file (`:memory:` for a throwaway database)
    pub database_path: String,

    /// Connection pool size
    pub db_max_connections: u32,

    /// JWT secret key for signing tokens
    pub jwt_secret: String,

    /// JWT lifetime in seconds
    pub jwt_lifetime_secs: i64,

    /// Allowed CORS origin; `None` allows any
    pub cors_allowed_origin: Option<String>,

    /// Log output format
    pub log_format: LogFormat,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            port: 4000,
            bind_addr: "0.0.0.0".to_string(),
            database_path: "stockroom.db".to_string(),
            db_max_connections: 5,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_lifetime_secs: 86_400, // 1 day
            cors_allowed_origin: None,
            log_format: LogFormat::Pretty,
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = ApiConfig::default();

        let config = ApiConfig {
            port: parse_var("PORT", defaults.port)?,

            bind_addr: env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),

            database_path: env::var("DATABASE_PATH").unwrap_or(defaults.database_path),

            db_max_connections: parse_var("DB_MAX_CONNECTIONS", defaults.db_max_connections)?,

            jwt_secret: env::var("JWT_SECRET").unwrap_or(defaults.jwt_secret),

            jwt_lifetime_secs: parse_var("JWT_LIFETIME_SECS", defaults.jwt_lifetime_secs)?,

            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .ok()
                .filter(|origin| !origin.trim().is_empty()),

            log_format: parse_var("LOG_FORMAT", defaults.log_format)?,
        };

        if config.jwt_secret.is_empty() {
            return Err(ConfigError::MissingRequired("JWT_SECRET".to_string()));
        }
        if config.jwt_lifetime_secs <= 0 {
            return Err(ConfigError::InvalidValue("JWT_LIFETIME_SECS".to_string()));
        }
        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()));
        }

        Ok(config)
    }

    /// True when signing with [`DEV_JWT_SECRET`].
    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }

    /// `bind_addr:port`, ready for `TcpListener::bind`.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name.to_string())),
        Err(_) => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
