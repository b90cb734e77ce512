//! HTTP client for the meditation-generation service.
//!
//! The service takes `{message, themes, userName}` as JSON and answers with
//! raw audio bytes, or a non-2xx status on failure.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::error::GenerationError;

/// Body of a generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub message: String,
    pub themes: Vec<String>,
    pub user_name: String,
}

impl GenerationRequest {
    pub fn new(message: impl Into<String>, themes: Vec<String>, user_name: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            themes,
            user_name: user_name.into(),
        }
    }
}

/// Anything that can turn a request into audio bytes.
#[async_trait]
pub trait MeditationGenerator: Send + Sync {
    /// Generate one meditation. Never retried by the caller.
    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<u8>, GenerationError>;
}

/// Generator backed by the HTTP service.
pub struct HttpMeditationGenerator {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
    api_key: Option<SecretString>,
}

impl HttpMeditationGenerator {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            timeout,
            api_key: None,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let mut generator = Self::new(config.endpoint.clone(), config.request_timeout);
        generator.api_key = config.api_key.clone();
        generator
    }

    /// Builder: send a bearer token with each request.
    pub fn with_api_key(mut self, api_key: SecretString) -> Self {
        self.api_key = Some(api_key);
        self
    }

    /// Builder: override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn map_transport(&self, e: reqwest::Error) -> GenerationError {
        if e.is_timeout() {
            GenerationError::Timeout {
                timeout: self.timeout,
            }
        } else {
            GenerationError::Transport {
                reason: e.to_string(),
            }
        }
    }
}

#[async_trait]
impl MeditationGenerator for HttpMeditationGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<u8>, GenerationError> {
        info!(
            endpoint = %self.endpoint,
            themes = ?request.themes,
            "Requesting meditation"
        );

        let mut builder = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .json(request);
        if let Some(ref key) = self.api_key {
            builder = builder.bearer_auth(key.expose_secret());
        }

        let resp = builder.send().await.map_err(|e| self.map_transport(e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Meditation generation rejected");
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body: body.chars().take(500).collect(),
            });
        }

        let bytes = resp.bytes().await.map_err(|e| self.map_transport(e))?;
        if bytes.is_empty() {
            return Err(GenerationError::EmptyAudio);
        }

        debug!(bytes = bytes.len(), "Meditation audio received");
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_user_name_camel_case() {
        let request = GenerationRequest::new("stressed", vec!["Sleep".into()], "Ada");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "message": "stressed",
                "themes": ["Sleep"],
                "userName": "Ada"
            })
        );
    }

    #[test]
    fn from_config_copies_endpoint_and_timeout() {
        let config = AppConfig {
            endpoint: "https://example.com/generate".to_string(),
            request_timeout: Duration::from_secs(5),
            ..AppConfig::default()
        };
        let generator = HttpMeditationGenerator::from_config(&config);
        assert_eq!(generator.endpoint(), "https://example.com/generate");
        assert_eq!(generator.timeout, Duration::from_secs(5));
        assert!(generator.api_key.is_none());
    }
}
