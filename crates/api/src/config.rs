//! Application configuration loaded from environment variables.

use thiserror::Error;

/// Configuration errors that abort startup.
///
/// The signing secrets are checked here, before the server binds;
/// a misconfigured process never accepts a registration it cannot
/// finish.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is missing or empty")]
    MissingSecret(&'static str),
}

/// Server configuration.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `3000`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `ACCESS_TOKEN_SECRET` — access-token signing secret (required)
/// - `REFRESH_TOKEN_SECRET` — refresh-token signing secret (required)
/// - `DATABASE_URL` — Postgres URL; when absent the in-memory store is used
/// - `STORE_TRANSACTIONS` — `true` selects the native-transaction
///   strategy, anything else the manual saga (default: `false`)
/// - `SEED_CATEGORIES` — comma-separated category names seeded into the
///   in-memory store at startup (ignored for Postgres)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub access_token_secret: String,
    pub refresh_token_secret: String,
    pub database_url: Option<String>,
    pub use_native_transactions: bool,
    pub seed_categories: Vec<String>,
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::MissingSecret(name)),
    }
}

impl Config {
    /// Loads configuration from environment variables, falling back to
    /// defaults for everything except the signing secrets.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            access_token_secret: required("ACCESS_TOKEN_SECRET")?,
            refresh_token_secret: required("REFRESH_TOKEN_SECRET")?,
            database_url: std::env::var("DATABASE_URL").ok().filter(|v| !v.is_empty()),
            use_native_transactions: std::env::var("STORE_TRANSACTIONS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            seed_categories: std::env::var("SEED_CATEGORIES")
                .map(|v| {
                    v.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        })
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
