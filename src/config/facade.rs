//! Loader facade: assembles sources in precedence order and deserializes the result.

use super::merge::merge_policy;
use super::sources::{environment, global_file, workspace_file};
use super::RoadmapConfig;
use config::{ConfigError, File};
use std::path::Path;
use tracing::debug;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace.
    ///
    /// Precedence (lowest to highest): built-in defaults, the user file, the workspace
    /// `config/config.toml`, the workspace `config/{ROADMAP_ENV}.toml`, environment.
    pub fn load(workspace_root: &Path) -> Result<RoadmapConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder);

        let config: RoadmapConfig = builder.build()?.try_deserialize()?;
        debug!(
            workspace = %workspace_root.display(),
            provider = config.generation.provider_type.as_str(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Load a single explicit file (plus defaults and environment).
    pub fn load_from_file(path: &Path) -> Result<RoadmapConfig, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let builder = merge_policy::builder_with_defaults()?
            .add_source(File::from(path).required(true));
        let builder = environment::add_to_builder(builder);
        builder.build()?.try_deserialize()
    }
}
