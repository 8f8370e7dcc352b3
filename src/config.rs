//! Server configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_DETECTOR_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid PORT: {0:?}")]
    InvalidPort(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectorConfig {
    pub url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    /// Postgres URL for settings; in-memory settings when absent.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    /// Layout detector endpoint; detection is disabled when absent.
    pub detector: Option<DetectorConfig>,
}

impl ServerConfig {
    /// Build typed server config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `DATABASE_URL`: in-memory settings when absent
    /// - `DB_MAX_CONNECTIONS`: default 5
    /// - `DETECTOR_URL`: detection endpoint answers 503 when absent
    /// - `DETECTOR_TIMEOUT_SECS`: default 60
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPort`] if `PORT` is set but not a port number.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match non_empty_var("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };
        let db_max_connections = std::env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS);
        let detector = non_empty_var("DETECTOR_URL").map(|url| DetectorConfig {
            url,
            timeout_secs: env_parse_u64("DETECTOR_TIMEOUT_SECS", DEFAULT_DETECTOR_TIMEOUT_SECS),
        });

        Ok(Self { port, database_url: non_empty_var("DATABASE_URL"), db_max_connections, detector })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}
