// src/engine/core.rs

//! Pure core runtime state machine.
//!
//! This module contains a synchronous, deterministic "core runtime" that
//! consumes [`RuntimeEvent`]s and produces:
//! - an updated core state
//! - a list of "commands" describing what the IO shell should do next
//!
//! The async shell (`engine::runtime::Runtime`) is responsible for reading
//! events from channels and sending `ScheduledTask`s to the executor.
//!
//! The core can be unit tested without any Tokio, channels, filesystem,
//! or processes.

use crate::dag::Scheduler;
use crate::engine::RuntimeEvent;
use crate::engine::event_handlers::{CoreStep, handle_run_start, handle_task_completion};
use crate::report::{RunOutcome, TaskReport};

/// Pure core runtime state.
///
/// It has **no** channels, no Tokio types, and does not perform any IO.
#[derive(Debug)]
pub struct CoreRuntime {
    scheduler: Scheduler,
}

impl CoreRuntime {
    pub fn new(scheduler: Scheduler) -> Self {
        Self { scheduler }
    }

    /// Produce the commands that kick off the run.
    pub fn start(&mut self) -> CoreStep {
        handle_run_start(&mut self.scheduler)
    }

    /// Handle a single runtime event, updating core state and returning the
    /// resulting commands for the IO shell.
    pub fn step(&mut self, event: RuntimeEvent) -> CoreStep {
        match event {
            RuntimeEvent::TaskCompleted { task, outcome } => {
                handle_task_completion(&mut self.scheduler, task, outcome)
            }
        }
    }

    /// Outcome and per-task results.
    pub fn results(&self) -> (RunOutcome, Vec<TaskReport>) {
        (self.scheduler.outcome(), self.scheduler.task_reports())
    }
}
