// src/report.rs

//! Final report of a provisioning run.

use std::fmt;
use std::path::PathBuf;

use crate::engine::TaskName;
use crate::errors::{Result, TaskError, ZincError};
use crate::types::FailurePolicy;

/// Terminal state of one task as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskResult {
    Succeeded,
    Failed(TaskError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReport {
    pub name: TaskName,
    pub policy: FailurePolicy,
    pub result: TaskResult,
}

impl TaskReport {
    pub fn succeeded(&self) -> bool {
        matches!(self.result, TaskResult::Succeeded)
    }

    pub fn error(&self) -> Option<&TaskError> {
        match &self.result {
            TaskResult::Failed(err) => Some(err),
            TaskResult::Succeeded => None,
        }
    }
}

/// Overall outcome: `Completed` iff no fatal-policy task failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Aborted { task: TaskName, reason: TaskError },
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub project: PathBuf,
    pub outcome: RunOutcome,
    /// One entry per task in the graph, in plan order.
    pub tasks: Vec<TaskReport>,
}

impl RunReport {
    pub fn is_completed(&self) -> bool {
        self.outcome == RunOutcome::Completed
    }

    pub fn task(&self, name: &str) -> Option<&TaskReport> {
        self.tasks.iter().find(|t| t.name == name)
    }

    /// Advisory failures; these never change the outcome.
    pub fn warnings(&self) -> impl Iterator<Item = &TaskReport> {
        self.tasks
            .iter()
            .filter(|t| t.policy == FailurePolicy::Advisory && !t.succeeded())
    }

    /// Turn an aborted run into an error for the caller.
    pub fn into_result(self) -> Result<RunReport> {
        match self.outcome {
            RunOutcome::Completed => Ok(self),
            RunOutcome::Aborted { task, reason } => Err(ZincError::Aborted {
                task,
                source: reason,
            }),
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "provisioning report for {}", self.project.display())?;

        let width = self.tasks.iter().map(|t| t.name.len()).max().unwrap_or(0);
        for task in &self.tasks {
            let (tag, detail) = match &task.result {
                TaskResult::Succeeded => ("ok", None),
                TaskResult::Failed(err) if err.is_propagated() => ("skipped", Some(err)),
                TaskResult::Failed(err) => match task.policy {
                    FailurePolicy::Fatal => ("FAILED", Some(err)),
                    FailurePolicy::Advisory => ("warning", Some(err)),
                },
            };
            match detail {
                Some(err) => writeln!(f, "  {tag:<8} {:<width$}  {err}", task.name)?,
                None => writeln!(f, "  {tag:<8} {}", task.name)?,
            }
        }

        match &self.outcome {
            RunOutcome::Completed => write!(f, "outcome: completed"),
            RunOutcome::Aborted { task, reason } => {
                write!(f, "outcome: aborted ({task}: {reason})")
            }
        }
    }
}
