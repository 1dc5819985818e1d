//! Configuration management for the inbox service

use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub webhook: WebhookConfig,
    pub app: AppConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite connection string, e.g. `sqlite:////data/app.db`.
    pub url: String,
    pub max_connections: u32,
    pub busy_timeout_ms: u64,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Shared HMAC secret. `None` (or empty) means the service is not ready to ingest.
    pub secret: Option<String>,
}

// El secreto nunca debe terminar en los logs
impl std::fmt::Debug for WebhookConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookConfig")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub log_level: String,
    pub log_format: LogFormat,
    pub port: u16,
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:////data/app.db".to_string(),
            max_connections: 5,
            busy_timeout_ms: 5_000,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            port: 8000,
            max_body_bytes: 64 * 1024,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = AppConfig::default();
        let db_defaults = DatabaseConfig::default();

        Ok(Config {
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or(db_defaults.url),
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| db_defaults.max_connections.to_string())
                    .parse()?,
                busy_timeout_ms: env::var("DATABASE_BUSY_TIMEOUT_MS")
                    .unwrap_or_else(|_| db_defaults.busy_timeout_ms.to_string())
                    .parse()?,
            },
            webhook: WebhookConfig {
                secret: env::var("WEBHOOK_SECRET").ok(),
            },
            app: AppConfig {
                log_level: env::var("LOG_LEVEL")
                    .unwrap_or(defaults.log_level)
                    .to_lowercase(),
                log_format: env::var("LOG_FORMAT")
                    .map(|raw| LogFormat::parse(&raw))
                    .unwrap_or(defaults.log_format),
                port: env::var("PORT")
                    .unwrap_or_else(|_| defaults.port.to_string())
                    .parse()?,
                max_body_bytes: env::var("MAX_BODY_BYTES")
                    .unwrap_or_else(|_| defaults.max_body_bytes.to_string())
                    .parse()?,
            },
        })
    }
}

impl WebhookConfig {
    /// The configured secret, treating an empty value the same as a missing one.
    pub fn configured_secret(&self) -> Option<&str> {
        self.secret.as_deref().filter(|s| !s.is_empty())
    }
}
