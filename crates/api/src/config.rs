//! Application configuration loaded from environment variables.

use std::time::Duration;

use document_store::Deadlines;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `8000`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `DATABASE_URL`: PostgreSQL URL; the in-memory store is used when unset
/// - `DB_MAX_CONNECTIONS`: pool size (default: `10`)
/// - `STORE_WRITE_TIMEOUT_SECS`: insert/update deadline (default: `10`)
/// - `STORE_READ_TIMEOUT_SECS`: single-document read deadline (default: `100`)
/// - `STORE_AGGREGATE_TIMEOUT_SECS`: join and listing deadline (default: `100`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub deadlines: Deadlines,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let secs = |key: &str, fallback: Duration| {
            lookup(key)
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|s| *s > 0)
                .map_or(fallback, Duration::from_secs)
        };

        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            db_max_connections: lookup("DB_MAX_CONNECTIONS")
                .and_then(|n| n.parse().ok())
                .unwrap_or(defaults.db_max_connections),
            deadlines: Deadlines {
                write: secs("STORE_WRITE_TIMEOUT_SECS", defaults.deadlines.write),
                read: secs("STORE_READ_TIMEOUT_SECS", defaults.deadlines.read),
                aggregate: secs("STORE_AGGREGATE_TIMEOUT_SECS", defaults.deadlines.aggregate),
            },
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            log_level: "info".to_string(),
            database_url: None,
            db_max_connections: 10,
            deadlines: Deadlines::default(),
        }
    }
}
