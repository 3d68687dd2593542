// src/exec/backend.rs

//! Pluggable executor backend abstraction.
//!
//! The runtime talks to an `ExecutorBackend` instead of spawning work itself.
//! This makes it easy to swap in a fake executor in tests while keeping the
//! production implementation here.
//!
//! - `RealExecutorBackend` runs each scheduled task on its own Tokio task
//!   inside a `JoinSet`, so all in-flight work is joined before the run ends.
//! - Tests can provide their own `ExecutorBackend` that, for example, records
//!   which tasks were scheduled and directly emits `TaskCompleted` events.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error};

use crate::dag::ScheduledTask;
use crate::engine::RuntimeEvent;
use crate::errors::Result;
use crate::fs::FileSystem;

use super::task_runner::run_task;

/// Trait abstracting how scheduled tasks are executed.
pub trait ExecutorBackend: Send {
    /// Dispatch the given tasks for execution.
    ///
    /// Implementations must eventually emit exactly one
    /// `RuntimeEvent::TaskCompleted` per dispatched task.
    fn spawn_ready_tasks(
        &mut self,
        tasks: Vec<ScheduledTask>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Wait for any background work to wind down once the run is over.
    fn shutdown(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async { Ok(()) })
    }
}

/// Everything a task runner needs besides the task itself.
#[derive(Debug, Clone)]
pub struct ExecContext {
    /// Working directory for every operation.
    pub project_dir: PathBuf,
    pub fs: Arc<dyn FileSystem>,
}

/// Real executor backend used in production.
pub struct RealExecutorBackend {
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    ctx: ExecContext,
    running: JoinSet<()>,
}

impl RealExecutorBackend {
    pub fn new(
        runtime_tx: mpsc::Sender<RuntimeEvent>,
        project_dir: PathBuf,
        fs: Arc<dyn FileSystem>,
    ) -> Self {
        Self {
            runtime_tx,
            ctx: ExecContext { project_dir, fs },
            running: JoinSet::new(),
        }
    }
}

impl ExecutorBackend for RealExecutorBackend {
    fn spawn_ready_tasks(
        &mut self,
        tasks: Vec<ScheduledTask>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        for task in tasks {
            let ctx = self.ctx.clone();
            let tx = self.runtime_tx.clone();
            self.running.spawn(async move {
                run_task(task, ctx, tx).await;
            });
        }
        Box::pin(async { Ok(()) })
    }

    fn shutdown(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            while let Some(res) = self.running.join_next().await {
                match res {
                    Ok(()) => debug!("task runner joined"),
                    Err(e) => error!(error = %e, "task runner panicked or was cancelled"),
                }
            }
            Ok(())
        })
    }
}
