//! Config file loading and service construction from config

use roadmap::cli::{Commands, ConfigCommands, RunContext};
use roadmap::config::ConfigLoader;
use roadmap::pipeline::RoadmapService;
use roadmap::provider::ProviderType;
use tempfile::TempDir;

fn write_config(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("roadmap.toml");
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn explicit_file_builds_service_with_enrichment() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[generation]
provider_type = "openai"
model = "gpt-4o-mini"
api_key = "sk-test"
temperature = 0.2

[search]
api_key = "yt-test"
max_results = 2
query_suffix = "explained"

[logging]
level = "debug"
format = "json"
"#,
    );

    let config = ConfigLoader::load_from_file(&path).unwrap();
    assert_eq!(config.generation.provider_type, ProviderType::OpenAI);
    assert_eq!(config.generation.completion_options().temperature, Some(0.2));
    assert_eq!(config.search.max_results, 2);
    assert_eq!(config.logging.format, "json");
    assert!(config.validate().is_ok());

    let service = RoadmapService::from_config(&config).unwrap();
    assert!(service.enrichment_enabled());
    assert_eq!(service.generator().provider_name(), "openai");
    assert_eq!(service.generator().model_name(), "gpt-4o-mini");
}

#[test]
fn disabled_search_builds_service_without_enrichment() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[generation]
provider_type = "local"
model = "qwen2.5"
endpoint = "http://localhost:8080/v1"

[search]
enabled = false
api_key = "yt-test"
"#,
    );

    let config = ConfigLoader::load_from_file(&path).unwrap();
    let service = RoadmapService::from_config(&config).unwrap();
    assert!(!service.enrichment_enabled());
    assert_eq!(service.generator().provider_name(), "local");
}

#[test]
fn invalid_values_are_all_reported() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[generation]
temperature = 5.0

[search]
max_results = 100
endpoint = "youtube"
"#,
    );

    let config = ConfigLoader::load_from_file(&path).unwrap();
    let errors = config.validate().unwrap_err();
    assert_eq!(errors.len(), 2);
}

#[test]
fn run_context_loads_explicit_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[server]\nport = 8088\n");

    let ctx = RunContext::new(dir.path().to_path_buf(), Some(path)).unwrap();
    assert_eq!(ctx.config().server.port, 8088);

    let shown = ctx
        .execute(&Commands::Config {
            command: ConfigCommands::Show,
        })
        .unwrap();
    assert!(shown.contains("port = 8088"));
}

#[test]
fn unknown_provider_type_fails_to_load() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[generation]\nprovider_type = \"carrier-pigeon\"\n");
    assert!(ConfigLoader::load_from_file(&path).is_err());
}
