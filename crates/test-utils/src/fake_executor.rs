use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use zinc::dag::ScheduledTask;
use zinc::engine::{RuntimeEvent, TaskOutcome};
use zinc::errors::{Result, TaskError};
use zinc::exec::task_runner::execute;
use zinc::exec::{ExecContext, ExecutorBackend};
use zinc::types::Operation;

/// A fake executor that:
/// - records the order in which tasks were dispatched
/// - immediately reports the scripted outcome for each task (success unless
///   scripted otherwise)
/// - optionally performs the file fix-up operation for real against an
///   `ExecContext`, so its effect on the project files can be checked.
pub struct ScriptedExecutor {
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    executed: Arc<Mutex<Vec<String>>>,
    outcomes: HashMap<String, TaskError>,
    fixup_ctx: Option<ExecContext>,
}

impl ScriptedExecutor {
    pub fn new(runtime_tx: mpsc::Sender<RuntimeEvent>, executed: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            runtime_tx,
            executed,
            outcomes: HashMap::new(),
            fixup_ctx: None,
        }
    }

    /// Make `task` fail with `err`.
    pub fn fail(mut self, task: &str, err: TaskError) -> Self {
        self.outcomes.insert(task.to_string(), err);
        self
    }

    /// Run `RewriteExecutablePaths` operations for real in `ctx`.
    pub fn with_real_fixups(mut self, ctx: ExecContext) -> Self {
        self.fixup_ctx = Some(ctx);
        self
    }
}

impl ExecutorBackend for ScriptedExecutor {
    fn spawn_ready_tasks(
        &mut self,
        tasks: Vec<ScheduledTask>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            for t in tasks {
                self.executed.lock().unwrap().push(t.name.clone());

                let outcome = match (self.outcomes.get(&t.name), &t.operation, &self.fixup_ctx) {
                    (Some(err), _, _) => TaskOutcome::Failed(err.clone()),
                    (None, op @ Operation::RewriteExecutablePaths { .. }, Some(ctx)) => {
                        execute(op, ctx).await.into()
                    }
                    (None, _, _) => TaskOutcome::Success,
                };

                self.runtime_tx
                    .send(RuntimeEvent::TaskCompleted {
                        task: t.name.clone(),
                        outcome,
                    })
                    .await
                    .map_err(anyhow::Error::from)?;
            }
            Ok(())
        })
    }
}
