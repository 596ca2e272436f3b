//! Merge rules: defaults, override order, conflict handling.

use crate::config::{
    DEFAULT_BIND, DEFAULT_MODEL, DEFAULT_PORT, DEFAULT_SEARCH_ENDPOINT, DEFAULT_TEMPERATURE,
};
use crate::enrichment::{DEFAULT_MAX_RESULTS, DEFAULT_QUERY_SUFFIX};
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("generation.provider_type", "gemini")?
        .set_default("generation.model", DEFAULT_MODEL)?
        .set_default("generation.temperature", DEFAULT_TEMPERATURE as f64)?
        .set_default("search.enabled", true)?
        .set_default("search.endpoint", DEFAULT_SEARCH_ENDPOINT)?
        .set_default("search.max_results", DEFAULT_MAX_RESULTS as u64)?
        .set_default("search.query_suffix", DEFAULT_QUERY_SUFFIX)?
        .set_default("server.bind", DEFAULT_BIND)?
        .set_default("server.port", DEFAULT_PORT as u64)
}
