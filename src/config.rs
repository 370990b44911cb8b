//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

/// Backend client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the marketplace REST API, without a trailing slash.
    pub api_base_url: String,
    /// File holding the cached auth token and session user.
    pub token_path: PathBuf,
    /// Per-request timeout applied by the HTTP client.
    pub http_timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: normalize_base_url(&api_base_url.into()),
            token_path: default_token_path(),
            http_timeout: Duration::from_secs(30),
        }
    }

    /// Build config from environment variables.
    ///
    /// `ONBOARDING_API_BASE_URL` is required; everything else has a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_base_url = std::env::var("ONBOARDING_API_BASE_URL")
            .map_err(|_| ConfigError::MissingEnvVar("ONBOARDING_API_BASE_URL".to_string()))?;
        if api_base_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "ONBOARDING_API_BASE_URL".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        let token_path = std::env::var("ONBOARDING_TOKEN_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_token_path());

        let http_timeout = match std::env::var("ONBOARDING_HTTP_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs: u64 = raw.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "ONBOARDING_HTTP_TIMEOUT_SECS".to_string(),
                    message: format!("expected whole seconds, got {raw:?}"),
                })?;
                Duration::from_secs(secs)
            }
            Err(_) => Duration::from_secs(30),
        };

        Ok(Self {
            api_base_url: normalize_base_url(&api_base_url),
            token_path,
            http_timeout,
        })
    }

    pub fn with_token_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_path = path.into();
        self
    }

    /// Join a resource path onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn default_token_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".writer-onboarding/session.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slash() {
        let config = ClientConfig::new("https://api.example.com/v1/");
        assert_eq!(config.api_base_url, "https://api.example.com/v1");
        assert_eq!(
            config.url("/writers/profile"),
            "https://api.example.com/v1/writers/profile"
        );
        assert_eq!(config.url("auth/me"), "https://api.example.com/v1/auth/me");
    }

    #[test]
    fn defaults() {
        let config = ClientConfig::new("http://localhost:8000");
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert!(config.token_path.ends_with(".writer-onboarding/session.json"));
    }

    #[test]
    fn with_token_path_overrides_default() {
        let config = ClientConfig::new("http://localhost").with_token_path("/tmp/s.json");
        assert_eq!(config.token_path, PathBuf::from("/tmp/s.json"));
    }
}
