use std::collections::HashMap;

use tracing::{debug, error, info, warn};

use crate::dag::graph::TaskGraph;
use crate::dag::scheduler_step::SchedulerStep;
use crate::dag::state_manager::{ReadOnlyStateManager, StateManager};
use crate::dag::task_info::{RunState, ScheduledTask, TaskInfo, TaskRunState};
use crate::engine::{TaskName, TaskOutcome};
use crate::errors::TaskError;
use crate::report::{RunOutcome, TaskReport, TaskResult};
use crate::types::FailurePolicy;

/// Scheduler holds the immutable task graph plus the mutable run state.
///
/// It is responsible for:
/// - deciding when a task is ready to run (all dependencies satisfied)
/// - recording succeeded/failed tasks
/// - skipping dependents of blocking failures
/// - remembering the first fatal failure, which aborts the run
///
/// The scheduler is synchronous and performs no IO; the engine feeds it
/// completions and dispatches whatever it returns.
#[derive(Debug)]
pub struct Scheduler {
    graph: TaskGraph,
    tasks: HashMap<TaskName, TaskInfo>,
    started: bool,
    finished: bool,
    /// First fatal failure observed, if any.
    aborted: Option<(TaskName, TaskError)>,
}

impl Scheduler {
    pub fn new(graph: TaskGraph) -> Self {
        let tasks = graph
            .specs()
            .map(|spec| (spec.name.clone(), TaskInfo::from_spec(spec)))
            .collect();

        Self {
            graph,
            tasks,
            started: false,
            finished: false,
            aborted: None,
        }
    }

    /// Returns `true` once every task reached a terminal state.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Returns `true` once a fatal task failed.
    pub fn is_aborted(&self) -> bool {
        self.aborted.is_some()
    }

    /// Read-only view of the given task's state.
    pub fn run_state_of(&self, task: &str) -> Option<TaskRunState> {
        self.tasks.get(task).map(|info| (&info.run_state).into())
    }

    /// Whether the dependencies of `task` are currently satisfied.
    ///
    /// Returns `None` if the task is unknown.
    pub fn deps_satisfied(&self, task: &str) -> Option<bool> {
        let info = self.tasks.get(task)?;
        let mgr = ReadOnlyStateManager::new(&self.tasks);
        Some(mgr.deps_satisfied_for_info(info))
    }

    /// Release the root task (production API).
    pub fn start(&mut self) -> Vec<ScheduledTask> {
        self.start_step_internal().newly_scheduled
    }

    /// Handle completion of a task with a concrete outcome (production API).
    pub fn handle_completion(&mut self, task: &str, outcome: TaskOutcome) -> Vec<ScheduledTask> {
        self.completion_step_internal(task, outcome).newly_scheduled
    }

    /// Manual-step variant of `start` that returns a rich [`SchedulerStep`].
    pub fn step_start(&mut self) -> SchedulerStep {
        self.start_step_internal()
    }

    /// Manual-step variant of `handle_completion`.
    pub fn step_completion(&mut self, task: &str, outcome: TaskOutcome) -> SchedulerStep {
        self.completion_step_internal(task, outcome)
    }

    /// Overall outcome so far.
    pub fn outcome(&self) -> RunOutcome {
        match &self.aborted {
            None => RunOutcome::Completed,
            Some((task, reason)) => RunOutcome::Aborted {
                task: task.clone(),
                reason: reason.clone(),
            },
        }
    }

    /// Per-task results in plan order.
    ///
    /// Tasks that are still pending or running (only possible if the run is
    /// not finished) are reported as failed with a propagated error naming
    /// the task itself, so a partial report never claims success.
    pub fn task_reports(&self) -> Vec<TaskReport> {
        self.graph
            .tasks()
            .filter_map(|name| self.tasks.get(name))
            .map(|info| TaskReport {
                name: info.name.clone(),
                policy: info.policy,
                result: match &info.run_state {
                    RunState::Succeeded => TaskResult::Succeeded,
                    RunState::Failed(err) => TaskResult::Failed(err.clone()),
                    RunState::Pending | RunState::Running => {
                        TaskResult::Failed(TaskError::DependencyUnsatisfied {
                            dependency: info.name.clone(),
                        })
                    }
                },
            })
            .collect()
    }

    /// Set `finished` if every task is terminal.
    ///
    /// Returns `true` if this call transitioned the run to finished.
    fn maybe_finish_run(&mut self) -> bool {
        if self.finished {
            return false;
        }

        let manager = StateManager::new(&self.graph, &mut self.tasks);
        if manager.all_tasks_terminal() {
            info!(
                aborted = self.aborted.is_some(),
                "scheduler: all tasks terminal; run finished"
            );
            self.finished = true;
            true
        } else {
            false
        }
    }

    fn start_step_internal(&mut self) -> SchedulerStep {
        if self.started {
            warn!("start called twice; ignoring");
            return SchedulerStep::default();
        }
        self.started = true;
        debug!(tasks = self.graph.len(), "scheduler: starting provisioning run");

        let mut manager = StateManager::new(&self.graph, &mut self.tasks);
        let newly_scheduled = manager.collect_new_ready_tasks();
        let run_just_finished = self.maybe_finish_run();

        SchedulerStep {
            newly_scheduled,
            newly_failed: Vec::new(),
            run_just_finished,
        }
    }

    fn completion_step_internal(&mut self, task: &str, outcome: TaskOutcome) -> SchedulerStep {
        let mut newly_failed = Vec::new();

        let Some(info) = self.tasks.get_mut(task) else {
            warn!(task = %task, "completion for unknown task; ignoring");
            return SchedulerStep::default();
        };

        if info.run_state != RunState::Running {
            warn!(
                task = %task,
                state = ?info.run_state,
                "completion for task that is not running; ignoring"
            );
            return SchedulerStep::default();
        }

        match outcome {
            TaskOutcome::Success => {
                info!(task = %info.name, "task succeeded");
                info.run_state = RunState::Succeeded;
            }
            TaskOutcome::Failed(err) => {
                newly_failed.push(info.name.clone());
                match info.policy {
                    FailurePolicy::Fatal => {
                        error!(task = %info.name, error = %err, "fatal task failed; aborting run");
                        if self.aborted.is_none() {
                            self.aborted = Some((info.name.clone(), err.clone()));
                        }
                        info.run_state = RunState::Failed(err);
                        let mut manager = StateManager::new(&self.graph, &mut self.tasks);
                        newly_failed.append(&mut manager.mark_dependents_failed(task));
                    }
                    FailurePolicy::Advisory => {
                        warn!(
                            task = %info.name,
                            error = %err,
                            "advisory task failed; continuing"
                        );
                        info.run_state = RunState::Failed(err);
                    }
                }
            }
        }

        // Unrelated branches keep going even after a fatal failure; only the
        // failed task's dependents were skipped above.
        let mut manager = StateManager::new(&self.graph, &mut self.tasks);
        let newly_scheduled = manager.collect_new_ready_tasks();
        let run_just_finished = self.maybe_finish_run();

        SchedulerStep {
            newly_scheduled,
            newly_failed,
            run_just_finished,
        }
    }
}
