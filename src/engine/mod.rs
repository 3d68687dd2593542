// src/engine/mod.rs

//! Orchestration engine for provisioning runs.
//!
//! This module ties together:
//! - the task scheduler
//! - the main runtime event loop that reacts to task completion events
//!
//! The pure core state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

use crate::errors::TaskError;

/// Canonical task name type used throughout the engine.
pub type TaskName = String;

/// Outcome of a task for the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Success,
    Failed(TaskError),
}

impl From<std::result::Result<(), TaskError>> for TaskOutcome {
    fn from(res: std::result::Result<(), TaskError>) -> Self {
        match res {
            Ok(()) => TaskOutcome::Success,
            Err(err) => TaskOutcome::Failed(err),
        }
    }
}

/// Events flowing into the runtime from executors.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// A task finished with a concrete outcome.
    TaskCompleted {
        task: TaskName,
        outcome: TaskOutcome,
    },
}

pub mod core;
pub mod event_handlers;
pub mod runtime;

pub use core::CoreRuntime;
pub use event_handlers::{CoreCommand, CoreStep};
pub use runtime::Runtime;
