// src/errors.rs

//! Crate-wide error types.
//!
//! - [`TaskError`] describes why a single provisioning task failed. It is
//!   cloneable so it can be stored in the scheduler state and the final report.
//! - [`ZincError`] is what the public entry points return.

use std::path::PathBuf;

use thiserror::Error;

/// Failure of one provisioning task (or one watcher launch).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// The external tool binary could not be launched at all.
    #[error("failed to launch `{program}`: {message}")]
    ProcessSpawnFailure { program: String, message: String },

    /// The external tool ran but reported failure.
    #[error("`{program}` exited with status {code}")]
    ProcessExitFailure { program: String, code: i32 },

    /// A probe showed the tool is not available; callers may downgrade this.
    #[error("`{tool}` is not installed")]
    ToolNotInstalled { tool: String },

    /// An upstream task failed in a way that blocks this one; it never ran.
    #[error("skipped because dependency '{dependency}' failed")]
    DependencyUnsatisfied { dependency: String },

    #[error("filesystem error: {0}")]
    Io(String),

    #[error("download of {url} failed: {message}")]
    Download { url: String, message: String },
}

impl TaskError {
    /// Whether this failure was caused upstream rather than by the task itself.
    pub fn is_propagated(&self) -> bool {
        matches!(self, TaskError::DependencyUnsatisfied { .. })
    }
}

#[derive(Error, Debug)]
pub enum ZincError {
    #[error("destination {0:?} already exists and is not an empty directory")]
    PathConflict(PathBuf),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Cycle detected in task graph: {0}")]
    DagCycle(String),

    #[error("Invalid task graph: {0}")]
    InvalidGraph(String),

    #[error("provisioning aborted: task '{task}' failed: {source}")]
    Aborted {
        task: String,
        #[source]
        source: TaskError,
    },

    #[error("none of the configured watchers could be started")]
    NoWatchersStarted,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, ZincError>;
