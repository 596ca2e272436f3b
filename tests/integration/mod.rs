//! Integration tests for the roadmap pipeline

mod config_loading;
mod fanout_concurrency;
mod server_api;
pub mod support;
