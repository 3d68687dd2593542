// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::provision::ProvisionOptions;
use crate::types::Platform;

/// Command-line arguments for `zinc`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "zinc",
    version,
    about = "Create and run Go + templ + htmx web projects.",
    long_about = None
)]
pub struct CliArgs {
    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `ZINC_LOG` or a default level will be used.
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create a new project from the template.
    Create(CreateArgs),
    /// Run the development watchers for a project until interrupted.
    Run(RunArgs),
}

#[derive(Debug, Clone, Args)]
pub struct CreateArgs {
    /// Directory to create the project in.
    #[arg(value_name = "PATH", default_value = "my_app")]
    pub path: PathBuf,

    /// Do not initialise a git repository.
    #[arg(long)]
    pub no_git: bool,

    /// Target platform (posix or windows). Defaults to the host platform.
    #[arg(long, value_name = "PLATFORM")]
    pub platform: Option<Platform>,

    /// Skip installing the CSS toolchain.
    #[arg(long)]
    pub no_style_tooling: bool,

    /// Download the htmx script into the project.
    #[arg(long)]
    pub http_helper: bool,

    /// Path to a config file (TOML).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Validate and print the task graph, but don't execute anything.
    #[arg(long)]
    pub dry_run: bool,
}

impl CreateArgs {
    pub fn options(&self) -> ProvisionOptions {
        ProvisionOptions {
            skip_version_control: self.no_git,
            platform: self.platform.unwrap_or_default(),
            style_tooling: !self.no_style_tooling,
            http_helper: self.http_helper,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Project directory the watchers run in.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub project_dir: PathBuf,

    /// Style-sheet output path for the CSS watcher.
    #[arg(long, value_name = "PATH")]
    pub css: Option<String>,

    /// Path to a config file (TOML).
    ///
    /// Default: `zinc.toml` in the project directory, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
