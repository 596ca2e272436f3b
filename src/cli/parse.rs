//! CLI parse: clap types for roadmap. No behavior; definitions only.

use crate::error::RequestError;
use crate::plan::LearningPlanRequest;
use crate::schema::SchemaDialect;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Roadmap CLI - AI-generated learning roadmaps enriched with video tutorials
#[derive(Parser)]
#[command(name = "roadmap", version)]
#[command(about = "Generate structured learning roadmaps and enrich them with video tutorials")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory (where config/ is looked up)
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, default_value = "false", conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API (POST /api/generate)
    Serve {
        /// Bind address (overrides server.bind)
        #[arg(long)]
        bind: Option<String>,
        /// Port (overrides server.port)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Generate one roadmap and print it
    Generate {
        #[command(flatten)]
        request: RequestArgs,
        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,
        /// Skip video enrichment
        #[arg(long)]
        no_enrich: bool,
    },
    /// Print the prompt that would be sent to the model
    Prompt {
        #[command(flatten)]
        request: RequestArgs,
    },
    /// Print the learning plan schema
    Schema {
        /// Schema dialect
        #[arg(long, value_enum, default_value = "gemini")]
        dialect: SchemaDialect,
    },
    /// Configuration commands (show, validate)
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Learner inputs shared by `generate` and `prompt`.
#[derive(Args, Debug, Clone)]
pub struct RequestArgs {
    /// Career goal, e.g. "Backend Engineer"
    #[arg(long)]
    pub goal: String,
    /// Why the learner wants it
    #[arg(long)]
    pub purpose: String,
    /// Current skill level
    #[arg(long)]
    pub level: String,
    /// Prior academic or professional background
    #[arg(long)]
    pub experience: Option<String>,
    /// Weekly time commitment, e.g. "10 hours"
    #[arg(long)]
    pub timeframe: Option<String>,
}

impl RequestArgs {
    pub fn to_request(&self) -> Result<LearningPlanRequest, RequestError> {
        Ok(
            LearningPlanRequest::new(self.goal.clone(), self.purpose.clone(), self.level.clone())?
                .with_academic_background(self.experience.clone())
                .with_weekly_time_commitment(self.timeframe.clone()),
        )
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML (keys masked)
    Show,
    /// Validate the effective configuration
    Validate,
}
