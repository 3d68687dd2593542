// src/dag/task_info.rs

//! Task metadata and per-run state.

use crate::engine::TaskName;
use crate::errors::TaskError;
use crate::types::{FailurePolicy, Operation};

/// Static description of one provisioning task, as produced by the plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSpec {
    pub name: TaskName,
    pub operation: Operation,
    /// Direct predecessors; this task waits for all of them.
    pub deps: Vec<TaskName>,
    pub policy: FailurePolicy,
}

impl TaskSpec {
    pub fn new<N: Into<TaskName>>(name: N, operation: Operation, policy: FailurePolicy) -> Self {
        Self {
            name: name.into(),
            operation,
            deps: Vec::new(),
            policy,
        }
    }

    /// Add a dependency on `dep`.
    pub fn after<N: Into<TaskName>>(mut self, dep: N) -> Self {
        self.deps.push(dep.into());
        self
    }
}

/// State of a task within the run (internal).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    /// Waiting on dependencies.
    Pending,
    /// Dispatched to the executor.
    Running,
    Succeeded,
    /// Failed while running, or never ran because of an upstream failure.
    Failed(TaskError),
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Succeeded | RunState::Failed(_))
    }
}

/// Public, read-only view of a task's state.
///
/// Exposed for tests and diagnostics without handing out the error payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskRunState {
    Pending,
    Running,
    Succeeded,
    Failed,
}

impl From<&RunState> for TaskRunState {
    fn from(state: &RunState) -> Self {
        match state {
            RunState::Pending => TaskRunState::Pending,
            RunState::Running => TaskRunState::Running,
            RunState::Succeeded => TaskRunState::Succeeded,
            RunState::Failed(_) => TaskRunState::Failed,
        }
    }
}

/// Static task information plus its current state.
#[derive(Debug, Clone)]
pub struct TaskInfo {
    pub name: TaskName,
    pub operation: Operation,
    pub policy: FailurePolicy,
    pub deps: Vec<TaskName>,
    pub run_state: RunState,
}

impl TaskInfo {
    pub fn from_spec(spec: &TaskSpec) -> Self {
        Self {
            name: spec.name.clone(),
            operation: spec.operation.clone(),
            policy: spec.policy,
            deps: spec.deps.clone(),
            run_state: RunState::Pending,
        }
    }

    /// A failed task blocks its dependents when it is fatal, or when it was
    /// itself skipped because of a blocking failure further upstream.
    pub fn blocks_dependents(&self) -> bool {
        match &self.run_state {
            RunState::Failed(err) => {
                self.policy == FailurePolicy::Fatal || err.is_propagated()
            }
            _ => false,
        }
    }
}

/// Description of a task that the scheduler wants the executor to run now.
#[derive(Debug, Clone)]
pub struct ScheduledTask {
    pub name: TaskName,
    pub operation: Operation,
    pub policy: FailurePolicy,
}

impl ScheduledTask {
    pub fn from_task_info(info: &TaskInfo) -> Self {
        Self {
            name: info.name.clone(),
            operation: info.operation.clone(),
            policy: info.policy,
        }
    }
}
