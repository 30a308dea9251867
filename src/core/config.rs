use std::env;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::core::error::{AppError, Result};

/// Connection settings for the Apillon API
#[derive(Debug, Clone)]
pub struct ApillonConfig {
    /// Base URL of the API, without trailing slash
    pub api_url: String,
    /// API key (username part of Basic auth)
    pub key: String,
    /// API key secret (password part of Basic auth)
    pub secret: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl ApillonConfig {
    pub const DEFAULT_API_URL: &'static str = "https://api.apillon.io";
    const DEFAULT_TIMEOUT_SECS: u64 = 30;

    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            api_url: Self::DEFAULT_API_URL.to_string(),
            key: key.into(),
            secret: secret.into(),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: format!("apillon-storage/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    pub fn from_env() -> Result<Self> {
        // Load .env file if exists, ignore if not found
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!("Error loading .env file: {}", e);
            }
        }

        let key = env::var("APILLON_API_KEY")
            .map_err(|_| AppError::Config("APILLON_API_KEY must be set".to_string()))?;

        let secret = env::var("APILLON_API_SECRET")
            .map_err(|_| AppError::Config("APILLON_API_SECRET must be set".to_string()))?;

        let api_url = env::var("APILLON_API_URL")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| Self::DEFAULT_API_URL.to_string());

        let timeout_secs = env::var("APILLON_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| {
                AppError::Config("APILLON_TIMEOUT_SECS must be a valid number".to_string())
            })?;

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(timeout_secs),
            ..Self::new(key, secret)
        })
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Value of the `Authorization` header: `Basic base64(key:secret)`
    pub fn authorization(&self) -> String {
        let credentials = format!("{}:{}", self.key, self.secret);
        format!("Basic {}", STANDARD.encode(credentials))
    }
}
