//! CLI route: single route table and run context. Dispatches to domain services and presentation.

use crate::cli::command_name;
use crate::cli::parse::{Commands, ConfigCommands, OutputFormat, RequestArgs};
use crate::cli::presentation::{format_config_validation, format_plan_text};
use crate::config::{ConfigLoader, RoadmapConfig};
use crate::error::ApiError;
use crate::pipeline::RoadmapService;
use crate::prompt::build_prompt;
use crate::schema::{learning_plan_schema, SchemaDialect};
use crate::server::run_serve;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Runtime context for CLI execution: workspace, config path, and the loaded configuration.
/// Built from workspace path and optional config path using ConfigLoader only.
pub struct RunContext {
    workspace_root: PathBuf,
    config_path: Option<PathBuf>,
    config: RoadmapConfig,
}

impl RunContext {
    /// Create run context from workspace root and optional config path. Uses ConfigLoader only.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        Ok(Self::with_config(workspace_root, config_path, config))
    }

    /// Create run context around an already-loaded configuration.
    pub fn with_config(
        workspace_root: PathBuf,
        config_path: Option<PathBuf>,
        config: RoadmapConfig,
    ) -> Self {
        Self {
            workspace_root,
            config_path,
            config,
        }
    }

    pub fn config(&self) -> &RoadmapConfig {
        &self.config
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        let started = Instant::now();
        let name = command_name(command);
        debug!(
            command = %name,
            workspace = %self.workspace_root.display(),
            config_path = ?self.config_path,
            "Executing command"
        );
        let result = self.execute_inner(command);
        match &result {
            Ok(_) => info!(
                command = %name,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Command finished"
            ),
            Err(e) => warn!(command = %name, error = %e, "Command failed"),
        }
        result
    }

    fn execute_inner(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Serve { bind, port } => self.handle_serve(bind.clone(), *port),
            Commands::Generate {
                request,
                format,
                no_enrich,
            } => self.handle_generate(request, *format, *no_enrich),
            Commands::Prompt { request } => Ok(build_prompt(
                &request.to_request()?,
                self.config.generation.provider_type.schema_dialect(),
            )),
            Commands::Schema { dialect } => self.handle_schema(*dialect),
            Commands::Config { command } => self.handle_config(command),
        }
    }

    fn handle_serve(&self, bind: Option<String>, port: Option<u16>) -> Result<String, ApiError> {
        let mut server = self.config.server.clone();
        if let Some(bind) = bind {
            server.bind = bind;
        }
        if let Some(port) = port {
            server.port = port;
        }
        let mut config = self.config.clone();
        config.server = server;
        config.ensure_valid()?;

        let service = Arc::new(RoadmapService::from_config(&config)?);
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(run_serve(&config.server, service))?;
        Ok("Server stopped".to_string())
    }

    fn handle_generate(
        &self,
        args: &RequestArgs,
        format: OutputFormat,
        no_enrich: bool,
    ) -> Result<String, ApiError> {
        let request = args.to_request()?;
        self.config.ensure_valid()?;
        let service = RoadmapService::from_config(&self.config)?;

        let rt = tokio::runtime::Runtime::new()?;
        let roadmap = rt.block_on(service.generate_with(&request, !no_enrich))?;

        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&roadmap.plan)?),
            OutputFormat::Text => Ok(format_plan_text(&roadmap)),
        }
    }

    fn handle_schema(&self, dialect: SchemaDialect) -> Result<String, ApiError> {
        Ok(serde_json::to_string_pretty(
            &learning_plan_schema().render(dialect),
        )?)
    }

    fn handle_config(&self, command: &ConfigCommands) -> Result<String, ApiError> {
        match command {
            ConfigCommands::Show => toml::to_string_pretty(&self.config.redacted())
                .map_err(|e| ApiError::ConfigError(format!("Failed to render config: {}", e))),
            ConfigCommands::Validate => {
                let result = self.config.validate();
                let text = format_config_validation(&result);
                match result {
                    Ok(()) => Ok(text),
                    Err(_) => Err(ApiError::ConfigError(text)),
                }
            }
        }
    }
}
