//! Configuration for the registration server.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// HTTP listener configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Managed backend configuration
    #[serde(default)]
    pub backend: BackendConfig,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Supabase project URL
    pub url: Option<String>,

    /// Supabase anon key
    pub anon_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// JSON file of events to seed the in-memory backend with
    pub seed_events: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Global requests per minute
    #[serde(default = "default_global_rpm")]
    pub global_per_minute: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            port: default_port(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: None,
            anon_key: None,
            timeout_secs: default_timeout_secs(),
            seed_events: None,
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            global_per_minute: default_global_rpm(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_listen_addr() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    8080
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_global_rpm() -> u32 {
    120
}

fn default_log_level() -> String {
    "info".into()
}

impl BackendConfig {
    /// Supabase URL and key, when both are set and non-empty.
    pub fn supabase(&self) -> Option<(&str, &str)> {
        match (self.url.as_deref(), self.anon_key.as_deref()) {
            (Some(url), Some(key)) if !url.is_empty() && !key.is_empty() => Some((url, key)),
            _ => None,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Nested keys use `__`, e.g. `BACKEND__URL` or `SERVER__PORT`.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.rate_limit.global_per_minute, 120);
        assert_eq!(config.backend.timeout(), Duration::from_secs(10));
        assert!(config.backend.supabase().is_none());
    }

    #[test]
    fn test_supabase_requires_url_and_key() {
        let mut backend = BackendConfig {
            url: Some("https://demo.supabase.co".into()),
            ..Default::default()
        };
        assert!(backend.supabase().is_none());

        backend.anon_key = Some(String::new());
        assert!(backend.supabase().is_none());

        backend.anon_key = Some("anon".into());
        assert_eq!(backend.supabase(), Some(("https://demo.supabase.co", "anon")));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: Config = serde_json::from_value(serde_json::json!({
            "server": { "port": 9000 },
            "backend": { "seed_events": "/data/events.json" }
        }))
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.listen_addr, "0.0.0.0");
        assert_eq!(
            config.backend.seed_events,
            Some(PathBuf::from("/data/events.json"))
        );
        assert_eq!(config.log.level, "info");
    }
}
