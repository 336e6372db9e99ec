//! Inventory configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `BACKSTOCK_API_BASE_URL` - Base URL of the backend item store
//!   (e.g., `https://api.example.com`)
//!
//! ## Optional
//! - `BACKSTOCK_CACHE_PATH` - Local movement cache file
//!   (default: `.backstock/movements.json`)
//! - `BACKSTOCK_SESSION_PATH` - Persisted session credentials file
//!   (default: `.backstock/session.json`)

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

const DEFAULT_CACHE_PATH: &str = ".backstock/movements.json";
const DEFAULT_SESSION_PATH: &str = ".backstock/session.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Inventory subsystem configuration.
#[derive(Debug, Clone)]
pub struct InventoryConfig {
    /// Base URL of the backend item store.
    pub base_url: Url,
    /// Path of the durable local movement cache.
    pub cache_path: PathBuf,
    /// Path of the persisted session credentials.
    pub session_path: PathBuf,
}

impl InventoryConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = parse_base_url(&get_required_env("BACKSTOCK_API_BASE_URL")?)?;
        let cache_path =
            PathBuf::from(get_env_or_default("BACKSTOCK_CACHE_PATH", DEFAULT_CACHE_PATH));
        let session_path = PathBuf::from(get_env_or_default(
            "BACKSTOCK_SESSION_PATH",
            DEFAULT_SESSION_PATH,
        ));

        Ok(Self {
            base_url,
            cache_path,
            session_path,
        })
    }

    /// Build a configuration directly, for tests and embedding.
    #[must_use]
    pub fn new(
        base_url: Url,
        cache_path: impl Into<PathBuf>,
        session_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            base_url,
            cache_path: cache_path.into(),
            session_path: session_path.into(),
        }
    }
}

/// Parse and validate the backend base URL.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| {
        ConfigError::InvalidEnvVar("BACKSTOCK_API_BASE_URL".to_string(), e.to_string())
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "BACKSTOCK_API_BASE_URL".to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    Ok(url)
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_url_http() {
        assert!(parse_base_url("http://127.0.0.1:8080").is_ok());
        assert!(parse_base_url("https://api.example.com/v1").is_ok());
    }

    #[test]
    fn test_parse_base_url_rejects_bad_scheme() {
        let err = parse_base_url("ftp://example.com").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_parse_base_url_rejects_garbage() {
        assert!(parse_base_url("not a url").is_err());
    }

    #[test]
    fn test_missing_env_var_display() {
        let err = ConfigError::MissingEnvVar("BACKSTOCK_API_BASE_URL".to_string());
        assert_eq!(
            err.to_string(),
            "Missing environment variable: BACKSTOCK_API_BASE_URL"
        );
    }

    #[test]
    fn test_new_sets_paths() {
        let config = InventoryConfig::new(
            Url::parse("http://localhost:8080").unwrap(),
            "/tmp/movements.json",
            "/tmp/session.json",
        );
        assert_eq!(config.cache_path, PathBuf::from("/tmp/movements.json"));
        assert_eq!(config.session_path, PathBuf::from("/tmp/session.json"));
    }
}
