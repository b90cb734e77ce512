//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Default local endpoint of the meditation-generation service.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000/generate-meditation";

/// Default generation request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Generation endpoint URL.
    pub endpoint: String,
    /// Per-request timeout for generation calls.
    pub request_timeout: Duration,
    /// Optional bearer token sent with generation requests.
    pub api_key: Option<SecretString>,
    /// Root directory for durable state.
    pub data_dir: PathBuf,
    /// Directory for rolling log files. Console only when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            api_key: None,
            data_dir: default_data_dir(),
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Build configuration from `MEDITATE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let endpoint =
            std::env::var("MEDITATE_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                key: "MEDITATE_ENDPOINT".to_string(),
                message: format!("expected an http(s) URL, got {endpoint:?}"),
            });
        }

        let request_timeout = match std::env::var("MEDITATE_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    key: "MEDITATE_TIMEOUT_SECS".to_string(),
                    message: format!("not a number of seconds: {raw:?}"),
                })?;
                Duration::from_secs(secs.max(1))
            }
            Err(_) => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let api_key = std::env::var("MEDITATE_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .map(SecretString::from);

        let data_dir = std::env::var("MEDITATE_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_data_dir());

        let log_dir = std::env::var("MEDITATE_LOG_DIR").ok().map(PathBuf::from);

        Ok(Self {
            endpoint,
            request_timeout,
            api_key,
            data_dir,
            log_dir,
        })
    }

    /// Directory holding generated audio payloads.
    pub fn audio_dir(&self) -> PathBuf {
        self.data_dir.join("audio")
    }

    /// Directory holding key-value files.
    pub fn store_dir(&self) -> PathBuf {
        self.data_dir.join("store")
    }
}

fn default_data_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".meditate-core")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_uses_local_endpoint() {
        let config = AppConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn derived_dirs_live_under_data_dir() {
        let config = AppConfig {
            data_dir: PathBuf::from("/tmp/meditate"),
            ..AppConfig::default()
        };
        assert_eq!(config.audio_dir(), PathBuf::from("/tmp/meditate/audio"));
        assert_eq!(config.store_dir(), PathBuf::from("/tmp/meditate/store"));
    }
}
