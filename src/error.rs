//! Error types for the roadmap generation pipeline.

use thiserror::Error;

/// Inbound request errors. Raised before any provider is contacted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("Missing required field: {field}")]
    InvalidRequest { field: &'static str },
}

/// Generation provider errors
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Provider request failed: {0}")]
    RequestFailed(String),

    #[error("Provider authentication failed: {0}")]
    AuthFailed(String),

    #[error("Provider rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Provider model not found: {0}")]
    ModelNotFound(String),
}

/// The generation step could not produce a usable plan.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("{0}")]
    ProviderFailure(#[from] ProviderError),

    #[error("Malformed generation response: {0}")]
    MalformedResponse(String),
}

/// Per-topic enrichment failure. Contained by the fan-out; never fatal.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("Search network error: {0}")]
    Network(String),

    #[error("Search API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Search response parse error: {0}")]
    Parse(String),

    #[error("Search provider not configured: {0}")]
    NotConfigured(String),
}

/// Errors surfaced by the pipeline, CLI, and HTTP boundary
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] RequestError),

    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        ApiError::Generation(GenerationError::ProviderFailure(err))
    }
}
