// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod provision;
pub mod report;
pub mod supervisor;
pub mod types;

use std::path::Path;

use tracing::{debug, warn};

use crate::cli::{CliArgs, Command, CreateArgs, RunArgs};
use crate::config::loader::{default_config_path, load_or_default};
use crate::dag::TaskGraph;
use crate::errors::Result;
use crate::provision::build_task_graph;

/// High-level entry point used by `main.rs`.
pub async fn run(args: CliArgs) -> Result<()> {
    match args.command {
        Command::Create(create_args) => create(create_args).await,
        Command::Run(run_args) => watch(run_args).await,
    }
}

/// `zinc create`: provision a project and print the report.
///
/// Returns an error (non-zero exit) only when a fatal task failed.
pub async fn create(args: CreateArgs) -> Result<()> {
    let cfg = load_or_default(args.config.as_deref(), None)?;
    let options = args.options();

    if args.dry_run {
        let graph = build_task_graph(&options, &cfg.create)?;
        print_dry_run(&args.path, &graph);
        return Ok(());
    }

    let report = provision::provision(&args.path, &options, &cfg.create).await?;
    println!("{report}");
    for task in report.warnings() {
        if let Some(err) = task.error() {
            warn!(task = %task.name, error = %err, "advisory task did not succeed");
        }
    }

    report.into_result()?;

    println!();
    println!("project created, next steps:");
    println!("  cd {}", args.path.display());
    println!("  zinc run");
    Ok(())
}

/// `zinc run`: supervise the project's watchers until interrupted.
pub async fn watch(args: RunArgs) -> Result<()> {
    let fallback = default_config_path(&args.project_dir);
    let cfg = load_or_default(args.config.as_deref(), Some(fallback.as_path()))?;
    let css = args.css.clone().unwrap_or_else(|| cfg.run.css.clone());

    supervisor::supervise(&args.project_dir, &cfg, &css).await
}

/// Print tasks, dependencies and operations without running anything.
fn print_dry_run(path: &Path, graph: &TaskGraph) {
    println!("zinc dry-run: {}", path.display());
    println!();

    println!("tasks ({}):", graph.len());
    for spec in graph.specs() {
        println!("  - {} [{}]", spec.name, spec.policy);
        println!("      op: {}", spec.operation);
        if !spec.deps.is_empty() {
            println!("      after: {:?}", spec.deps);
        }
    }

    debug!("dry-run complete (no execution)");
}
