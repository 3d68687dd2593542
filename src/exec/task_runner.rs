// src/exec/task_runner.rs

//! Individual task runner.

use std::time::Instant;

use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::dag::ScheduledTask;
use crate::engine::{RuntimeEvent, TaskOutcome};
use crate::errors::TaskError;
use crate::types::{FailurePolicy, Operation};

use super::backend::ExecContext;
use super::{command, ops, vcs};

/// Run a single task to completion and emit its `TaskCompleted` event.
///
/// Every error is converted into `TaskOutcome::Failed`; the scheduler decides
/// what the failure means for the rest of the run.
pub async fn run_task(task: ScheduledTask, ctx: ExecContext, runtime_tx: mpsc::Sender<RuntimeEvent>) {
    info!(
        task = %task.name,
        operation = %task.operation,
        "starting task"
    );
    let started = Instant::now();

    let outcome: TaskOutcome = execute(&task.operation, &ctx).await.into();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    match &outcome {
        TaskOutcome::Success => info!(task = %task.name, elapsed_ms, "task finished"),
        TaskOutcome::Failed(err) => match task.policy {
            FailurePolicy::Fatal => {
                error!(task = %task.name, elapsed_ms, error = %err, "task failed")
            }
            FailurePolicy::Advisory => {
                warn!(task = %task.name, elapsed_ms, error = %err, "task failed")
            }
        },
    }

    if let Err(e) = runtime_tx
        .send(RuntimeEvent::TaskCompleted {
            task: task.name.clone(),
            outcome,
        })
        .await
    {
        error!(task = %task.name, error = %e, "runtime dropped before task completion was delivered");
    }
}

/// Perform one operation with the project directory as working directory.
pub async fn execute(operation: &Operation, ctx: &ExecContext) -> Result<(), TaskError> {
    match operation {
        Operation::Command(cmd) => command::run_command(cmd, &ctx.project_dir).await,
        Operation::RemoveDir(rel) => {
            ops::remove_dir(ctx.fs.clone(), ctx.project_dir.join(rel)).await
        }
        Operation::Download { url, dest, timeout } => {
            ops::download_file(ctx.fs.as_ref(), url, &ctx.project_dir.join(dest), *timeout).await
        }
        Operation::RewriteExecutablePaths {
            file,
            executable,
            suffix,
        } => ops::rewrite_executable_paths(
            ctx.fs.as_ref(),
            &ctx.project_dir.join(file),
            executable,
            suffix,
        )
        .map(|_| ()),
        Operation::InitRepository { vcs } => vcs::init_repository(vcs, &ctx.project_dir).await,
    }
}
