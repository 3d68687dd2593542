// src/provision/mod.rs

//! Provisioning orchestrator: `zinc create`.
//!
//! Builds the task graph from [`plan`], prepares the destination directory and
//! drives the graph through the engine runtime with a real executor.

pub mod options;
pub mod plan;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::config::CreateSection;
use crate::dag::{Scheduler, TaskGraph};
use crate::engine::{CoreRuntime, Runtime, RuntimeEvent};
use crate::errors::{Result, ZincError};
use crate::exec::{ExecutorBackend, RealExecutorBackend};
use crate::fs::{FileSystem, RealFileSystem};
use crate::report::RunReport;

pub use options::ProvisionOptions;
pub use plan::build_task_graph;

/// Create a project at `path`.
///
/// The graph is validated before the filesystem is touched. An aborted run is
/// still returned as `Ok`; use [`RunReport::into_result`] to turn it into an
/// error.
pub async fn provision(
    path: &Path,
    options: &ProvisionOptions,
    create: &CreateSection,
) -> Result<RunReport> {
    let graph = build_task_graph(options, create)?;

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let project = prepare_destination(fs.as_ref(), path)?;
    info!(project = %project.display(), tasks = graph.len(), ?options, "provisioning project");

    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);
    let executor = RealExecutorBackend::new(rt_tx, project.clone(), fs);

    run_graph(project, graph, rt_rx, executor).await
}

/// Drive an already-built graph to completion with the given executor.
pub async fn run_graph<E: ExecutorBackend>(
    project: PathBuf,
    graph: TaskGraph,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    executor: E,
) -> Result<RunReport> {
    let core = CoreRuntime::new(Scheduler::new(graph));
    let runtime = Runtime::new(core, event_rx, executor);
    let (outcome, tasks) = runtime.run().await?;

    Ok(RunReport {
        project,
        outcome,
        tasks,
    })
}

/// Resolve `path` to an absolute path and make sure it can receive a project.
///
/// Missing directories (and parents) are created. An existing empty directory
/// is accepted, so re-running after an aborted attempt that failed before the
/// clone works. Anything else already at the path is a `PathConflict`.
pub fn prepare_destination(fs: &dyn FileSystem, path: &Path) -> Result<PathBuf> {
    let resolved = std::path::absolute(path)?;

    if fs.is_dir(&resolved) {
        let entries = fs.read_dir(&resolved)?;
        if !entries.is_empty() {
            return Err(ZincError::PathConflict(resolved));
        }
        debug!(path = %resolved.display(), "destination exists and is empty");
        return Ok(resolved);
    }

    if fs.exists(&resolved) {
        return Err(ZincError::PathConflict(resolved));
    }

    fs.create_dir_all(&resolved)?;
    debug!(path = %resolved.display(), "created destination");
    Ok(resolved)
}
