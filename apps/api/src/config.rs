use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a development default; malformed numbers fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the main backend (guidance, interview, learning-path APIs).
    pub api_base_url: String,
    /// Base URL of the career-guidance microservice probed by the health monitor.
    pub guidance_service_url: String,
    /// Base URL of the roadmap service queried by the roadmap view.
    pub roadmap_service_url: String,
    /// Directory backing the durable key-value store.
    pub storage_dir: PathBuf,
    pub health_timeout: Duration,
    pub health_interval: Duration,
    pub upstream_timeout: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            api_base_url: env_or("API_BASE_URL", "http://localhost:5001/api"),
            guidance_service_url: env_or("GUIDANCE_SERVICE_URL", "http://localhost:5002"),
            roadmap_service_url: env_or("ROADMAP_SERVICE_URL", "http://localhost:5000"),
            storage_dir: PathBuf::from(env_or("STORAGE_DIR", "./data")),
            health_timeout: Duration::from_millis(parse_env("HEALTH_TIMEOUT_MS", 3000)?),
            health_interval: Duration::from_millis(parse_env("HEALTH_INTERVAL_MS", 3000)?),
            upstream_timeout: Duration::from_secs(parse_env("UPSTREAM_TIMEOUT_SECS", 60)?),
            port: parse_env("PORT", 8080)?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_uses_default_when_unset() {
        let value: u64 = parse_env("NEXUS_TEST_UNSET_VARIABLE", 3000).unwrap();
        assert_eq!(value, 3000);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("NEXUS_TEST_BAD_PORT", "eighty");
        let result: Result<u16> = parse_env("NEXUS_TEST_BAD_PORT", 8080);
        assert!(result.is_err());
        std::env::remove_var("NEXUS_TEST_BAD_PORT");
    }
}
