// src/engine/event_handlers.rs

//! Event handling logic for the core runtime.

use crate::dag::{ScheduledTask, Scheduler};
use crate::engine::{TaskName, TaskOutcome};

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone)]
pub enum CoreCommand {
    /// Send these tasks to the executor.
    DispatchTasks(Vec<ScheduledTask>),
    /// Every task is terminal; the shell should stop.
    RequestExit,
}

/// Decision returned by the core after handling a single event.
#[derive(Debug, Clone)]
pub struct CoreStep {
    /// Commands the IO shell should execute.
    pub commands: Vec<CoreCommand>,
    /// Whether the outer runtime loop should keep running.
    pub keep_running: bool,
}

/// Start the run by releasing the root task.
pub fn handle_run_start(scheduler: &mut Scheduler) -> CoreStep {
    let step = scheduler.step_start();
    finish_step(step.newly_scheduled, step.run_just_finished || scheduler.is_finished())
}

/// Handle a task completion event.
pub fn handle_task_completion(
    scheduler: &mut Scheduler,
    task: TaskName,
    outcome: TaskOutcome,
) -> CoreStep {
    let step = scheduler.step_completion(&task, outcome);
    finish_step(step.newly_scheduled, scheduler.is_finished())
}

fn finish_step(newly_ready: Vec<ScheduledTask>, finished: bool) -> CoreStep {
    let mut commands = Vec::new();

    if !newly_ready.is_empty() {
        commands.push(CoreCommand::DispatchTasks(newly_ready));
    }

    if finished {
        commands.push(CoreCommand::RequestExit);
    }

    CoreStep {
        commands,
        keep_running: !finished,
    }
}
