//! Configuration System
//!
//! Layered configuration for the generation provider, the video search provider, the HTTP
//! server, and logging. Defaults, then the user-level file, then workspace files, then
//! `ROADMAP__SECTION__KEY` environment variables.

use crate::enrichment::{DEFAULT_MAX_RESULTS, DEFAULT_QUERY_SUFFIX, MAX_VIDEOS_PER_TOPIC};
use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::provider::{CompletionOptions, ModelProvider, ProviderType};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::global_file::global_config_path;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-001";
pub const DEFAULT_TEMPERATURE: f32 = 0.4;
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoadmapConfig {
    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Generation provider settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default)]
    pub provider_type: ProviderType,

    #[serde(default = "default_model")]
    pub model: String,

    /// Falls back to `GEMINI_API_KEY` or `OPENAI_API_KEY` depending on the provider
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL override; required for `local`
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default)]
    pub max_output_tokens: Option<u32>,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider_type: ProviderType::default(),
            model: default_model(),
            api_key: None,
            endpoint: None,
            temperature: default_temperature(),
            max_output_tokens: None,
        }
    }
}

impl GenerationConfig {
    /// Environment variable consulted when `api_key` is unset.
    pub fn api_key_env_var(&self) -> Option<&'static str> {
        match self.provider_type {
            ProviderType::Gemini => Some("GEMINI_API_KEY"),
            ProviderType::OpenAI => Some("OPENAI_API_KEY"),
            ProviderType::Ollama | ProviderType::LocalCustom => None,
        }
    }

    /// Configured key, else the provider's conventional environment variable.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.resolved_api_key_with(|name| std::env::var(name).ok())
    }

    pub fn resolved_api_key_with<F>(&self, lookup: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        non_blank(self.api_key.clone())
            .or_else(|| self.api_key_env_var().and_then(|name| non_blank(lookup(name))))
    }

    pub fn completion_options(&self) -> CompletionOptions {
        CompletionOptions {
            temperature: Some(self.temperature),
            max_tokens: self.max_output_tokens,
        }
    }

    pub fn to_model_provider(&self) -> Result<ModelProvider, ApiError> {
        self.to_model_provider_with(self.resolved_api_key())
    }

    fn to_model_provider_with(&self, api_key: Option<String>) -> Result<ModelProvider, ApiError> {
        let missing_key = || {
            ApiError::ConfigError(format!(
                "No API key for provider '{}': set generation.api_key or {}",
                self.provider_type.as_str(),
                self.api_key_env_var().unwrap_or("generation.api_key")
            ))
        };
        let model = self.model.clone();
        let endpoint = self.endpoint.clone();

        match self.provider_type {
            ProviderType::Gemini => Ok(ModelProvider::Gemini {
                model,
                api_key: api_key.ok_or_else(missing_key)?,
                base_url: endpoint,
            }),
            ProviderType::OpenAI => Ok(ModelProvider::OpenAI {
                model,
                api_key: api_key.ok_or_else(missing_key)?,
                base_url: endpoint,
            }),
            ProviderType::Ollama => Ok(ModelProvider::Ollama {
                model,
                base_url: endpoint,
            }),
            ProviderType::LocalCustom => Ok(ModelProvider::LocalCustom {
                model,
                endpoint: endpoint.ok_or_else(|| {
                    ApiError::ConfigError(
                        "Local provider requires generation.endpoint".to_string(),
                    )
                })?,
                api_key,
            }),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("Model name cannot be empty".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!(
                "Temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            ));
        }
        if self.max_output_tokens == Some(0) {
            return Err("max_output_tokens must be positive".to_string());
        }
        if let Some(endpoint) = &self.endpoint {
            check_url(endpoint)?;
        }
        if self.provider_type == ProviderType::LocalCustom && self.endpoint.is_none() {
            return Err("Local provider requires an endpoint".to_string());
        }
        Ok(())
    }
}

/// Video search settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Off means plans are returned without video enrichment
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Falls back to `YOUTUBE_API_KEY`
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_max_results")]
    pub max_results: usize,

    #[serde(default = "default_query_suffix")]
    pub query_suffix: String,

    /// Cap on in-flight searches; unset issues all at once
    #[serde(default)]
    pub max_concurrency: Option<usize>,
}

pub const SEARCH_API_KEY_ENV: &str = "YOUTUBE_API_KEY";

fn default_true() -> bool {
    true
}

fn default_search_endpoint() -> String {
    DEFAULT_SEARCH_ENDPOINT.to_string()
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

fn default_query_suffix() -> String {
    DEFAULT_QUERY_SUFFIX.to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            api_key: None,
            endpoint: default_search_endpoint(),
            max_results: default_max_results(),
            query_suffix: default_query_suffix(),
            max_concurrency: None,
        }
    }
}

impl SearchConfig {
    pub fn resolved_api_key(&self) -> Option<String> {
        self.resolved_api_key_with(|name| std::env::var(name).ok())
    }

    pub fn resolved_api_key_with<F>(&self, lookup: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        non_blank(self.api_key.clone()).or_else(|| non_blank(lookup(SEARCH_API_KEY_ENV)))
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_results == 0 || self.max_results > MAX_VIDEOS_PER_TOPIC {
            return Err(format!(
                "max_results must be between 1 and {}, got {}",
                MAX_VIDEOS_PER_TOPIC, self.max_results
            ));
        }
        if self.max_concurrency == Some(0) {
            return Err("max_concurrency must be positive when set".to_string());
        }
        check_url(&self.endpoint)
    }
}

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.bind
            .parse::<IpAddr>()
            .map(|_| ())
            .map_err(|_| format!("Invalid bind address: {}", self.bind))
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    Generation(String),
    Search(String),
    Server(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Generation(msg) => write!(f, "Generation: {}", msg),
            ValidationError::Search(msg) => write!(f, "Search: {}", msg),
            ValidationError::Server(msg) => write!(f, "Server: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl RoadmapConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.generation.validate() {
            errors.push(ValidationError::Generation(e));
        }
        if let Err(e) = self.search.validate() {
            errors.push(ValidationError::Search(e));
        }
        if let Err(e) = self.server.validate() {
            errors.push(ValidationError::Server(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate and fold all errors into one `ApiError`.
    pub fn ensure_valid(&self) -> Result<(), ApiError> {
        self.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })
    }

    /// Copy with secrets masked, for display.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.generation.api_key.is_some() {
            config.generation.api_key = Some("***".to_string());
        }
        if config.search.api_key.is_some() {
            config.search.api_key = Some("***".to_string());
        }
        config
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn check_url(url: &str) -> Result<(), String> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(format!("Endpoint must be an http(s) URL, got '{}'", url))
    }
}
