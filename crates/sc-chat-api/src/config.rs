//! Chat API server configuration.
//!
//! Built once in `main` and handed to component constructors by reference;
//! no component reads process environment state directly.

use serde::Deserialize;

/// Configuration failed in a way that must prevent startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("LLM_API_KEY must be set")]
    MissingLlmKey,

    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Top-level API server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Listen address (e.g., "0.0.0.0").
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Product catalog service base URL.
    #[serde(default = "default_catalog_base_url")]
    pub catalog_base_url: String,
    /// LLM completion API base URL (OpenAI-compatible).
    #[serde(default = "default_llm_api_url")]
    pub llm_api_url: String,
    /// LLM API key. Required — startup fails without it.
    pub llm_api_key: String,
    /// Model identifier sent with every completion request.
    #[serde(default = "default_llm_model")]
    pub llm_model: String,
    /// Per-call timeout for both upstreams, in seconds.
    #[serde(default = "default_upstream_timeout_secs")]
    pub upstream_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_catalog_base_url() -> String {
    "https://dummyjson.com".to_string()
}

fn default_llm_api_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_llm_model() -> String {
    "llama-3.1-8b-instant".to_string()
}

fn default_upstream_timeout_secs() -> u64 {
    10
}

impl ApiConfig {
    /// Load config from environment variables.
    ///
    /// `LLM_API_KEY` is mandatory; without it the process must not start.
    pub fn from_env() -> Result<Self, ConfigError> {
        let llm_api_key = std::env::var("LLM_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingLlmKey)?;

        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                name: "PORT",
                value: raw,
            })?,
            Err(_) => default_port(),
        };

        let upstream_timeout_secs = match std::env::var("UPSTREAM_TIMEOUT_SECS") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                name: "UPSTREAM_TIMEOUT_SECS",
                value: raw,
            })?,
            Err(_) => default_upstream_timeout_secs(),
        };

        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| default_host()),
            port,
            catalog_base_url: std::env::var("CATALOG_BASE_URL")
                .unwrap_or_else(|_| default_catalog_base_url()),
            llm_api_url: std::env::var("LLM_API_URL").unwrap_or_else(|_| default_llm_api_url()),
            llm_api_key,
            llm_model: std::env::var("LLM_MODEL").unwrap_or_else(|_| default_llm_model()),
            upstream_timeout_secs,
        })
    }

    /// Config with defaults plus an explicit key — the test constructor.
    pub fn with_key(llm_api_key: impl Into<String>) -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            catalog_base_url: default_catalog_base_url(),
            llm_api_url: default_llm_api_url(),
            llm_api_key: llm_api_key.into(),
            llm_model: default_llm_model(),
            upstream_timeout_secs: default_upstream_timeout_secs(),
        }
    }
}
