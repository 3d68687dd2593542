// src/dag/state_manager.rs

//! State transitions for tasks in the scheduler.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::dag::task_info::{RunState, ScheduledTask, TaskInfo};
use crate::dag::TaskGraph;
use crate::engine::TaskName;
use crate::errors::TaskError;

/// Manages state transitions for the tasks of one provisioning run.
pub struct StateManager<'a> {
    graph: &'a TaskGraph,
    tasks: &'a mut HashMap<TaskName, TaskInfo>,
}

impl<'a> StateManager<'a> {
    pub fn new(graph: &'a TaskGraph, tasks: &'a mut HashMap<TaskName, TaskInfo>) -> Self {
        Self { graph, tasks }
    }

    /// Determine whether all dependencies of the given task are satisfied.
    pub fn deps_satisfied_for_info(&self, info: &TaskInfo) -> bool {
        let ro = ReadOnlyStateManager::new(self.tasks);
        ro.deps_satisfied_for_info(info)
    }

    /// Mark every not-yet-started transitive dependent of `failed_task` as
    /// `Failed(DependencyUnsatisfied)`.
    ///
    /// Running dependents are impossible (they would have needed the failed
    /// task to be terminal first) and terminal ones are left alone.
    ///
    /// Returns the tasks that were newly marked as failed, excluding
    /// `failed_task` itself.
    pub fn mark_dependents_failed(&mut self, failed_task: &str) -> Vec<TaskName> {
        let mut stack: Vec<(TaskName, TaskName)> = self
            .graph
            .dependents_of(failed_task)
            .iter()
            .map(|d| (d.clone(), failed_task.to_string()))
            .collect();

        let mut newly_failed = Vec::new();

        while let Some((name, blocker)) = stack.pop() {
            let Some(info) = self.tasks.get_mut(&name) else {
                warn!(task = %name, "node in graph not present in tasks map");
                continue;
            };

            match info.run_state {
                RunState::Pending => {
                    info.run_state = RunState::Failed(TaskError::DependencyUnsatisfied {
                        dependency: blocker,
                    });
                    warn!(
                        task = %info.name,
                        policy = %info.policy,
                        "skipping task due to upstream failure"
                    );
                    newly_failed.push(info.name.clone());
                    stack.extend(
                        self.graph
                            .dependents_of(&name)
                            .iter()
                            .map(|d| (d.clone(), name.clone())),
                    );
                }
                RunState::Running => {
                    warn!(
                        task = %info.name,
                        "dependent already running while upstream failed; letting it finish"
                    );
                }
                RunState::Succeeded | RunState::Failed(_) => {}
            }
        }

        newly_failed
    }

    /// Collect tasks that are `Pending` and whose dependencies are satisfied,
    /// mark them as `Running`, and return them as `ScheduledTask`s.
    pub fn collect_new_ready_tasks(&mut self) -> Vec<ScheduledTask> {
        // Decide first, then mutate to avoid borrowing issues.
        let candidates: Vec<TaskName> = self
            .graph
            .tasks()
            .filter_map(|name| self.tasks.get(name))
            .filter(|info| {
                matches!(info.run_state, RunState::Pending) && self.deps_satisfied_for_info(info)
            })
            .map(|info| info.name.clone())
            .collect();

        let mut ready = Vec::with_capacity(candidates.len());
        for name in candidates {
            if let Some(info) = self.tasks.get_mut(&name) {
                info!(
                    task = %info.name,
                    policy = %info.policy,
                    operation = %info.operation,
                    "scheduling task"
                );
                debug!(task = %info.name, "dependencies satisfied; marking Running");
                info.run_state = RunState::Running;
                ready.push(ScheduledTask::from_task_info(info));
            }
        }

        ready
    }

    /// Check if all tasks are in a terminal state.
    pub fn all_tasks_terminal(&self) -> bool {
        self.tasks.values().all(|info| info.run_state.is_terminal())
    }
}

/// A read-only view for checking dependency satisfaction.
pub struct ReadOnlyStateManager<'a> {
    tasks: &'a HashMap<TaskName, TaskInfo>,
}

impl<'a> ReadOnlyStateManager<'a> {
    pub fn new(tasks: &'a HashMap<TaskName, TaskInfo>) -> Self {
        Self { tasks }
    }

    /// A dependency is satisfied when it succeeded, or when it failed on its
    /// own account under the `Advisory` policy.
    pub fn deps_satisfied_for_info(&self, info: &TaskInfo) -> bool {
        info.deps.iter().all(|dep_name| {
            let Some(dep) = self.tasks.get(dep_name) else {
                warn!(
                    task = %info.name,
                    dep = %dep_name,
                    "dependency missing from tasks map"
                );
                return false;
            };

            match dep.run_state {
                RunState::Succeeded => true,
                RunState::Failed(_) => !dep.blocks_dependents(),
                RunState::Pending | RunState::Running => false,
            }
        })
    }
}
