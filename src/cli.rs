//! CLI domain: parse, route, help, output, and presentation only.
//! No domain orchestration; single route table dispatches to domain services.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::map_error;
pub use parse::{Cli, Commands, ConfigCommands, OutputFormat, RequestArgs};
pub use presentation::{format_config_validation, format_plan_text, format_section_heading};
pub use route::RunContext;
