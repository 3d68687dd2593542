// src/exec/vcs.rs

//! Version-control initialisation for a freshly provisioned project.

use std::path::Path;

use tracing::{info, warn};

use crate::errors::TaskError;
use crate::types::CommandSpec;

use super::command::{probe, run_command};

/// Initialise a repository in `dir` and stage every file.
///
/// The client is probed first with `<vcs> --version`; an unusable client is
/// reported as [`TaskError::ToolNotInstalled`] rather than a spawn failure so
/// the caller can treat it as a warning.
pub async fn init_repository(vcs: &str, dir: &Path) -> Result<(), TaskError> {
    if !is_installed(vcs, dir).await {
        warn!(vcs, "version control client not installed; skipping repository initialisation");
        return Err(TaskError::ToolNotInstalled {
            tool: vcs.to_string(),
        });
    }

    run_command(&CommandSpec::new(vcs, ["init"]), dir).await?;
    run_command(&CommandSpec::new(vcs, ["add", "."]), dir).await?;

    info!(vcs, dir = %dir.display(), "repository initialised and files staged");
    Ok(())
}

/// Probe the VCS client by invoking its version command.
pub async fn is_installed(vcs: &str, dir: &Path) -> bool {
    probe(&CommandSpec::new(vcs, ["--version"]), dir).await
}
