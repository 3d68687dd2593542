// src/exec/mod.rs

//! Task execution layer.
//!
//! This module actually performs the provisioning operations (external
//! commands via `tokio::process::Command`, plus a few built-in filesystem and
//! network operations) and reports back to the runtime via `RuntimeEvent`s.
//!
//! - [`backend`] provides the `ExecutorBackend` trait and the
//!   `RealExecutorBackend` the runtime uses in production; tests replace it
//!   with a fake.
//! - [`task_runner`] runs one scheduled task and emits its completion.
//! - [`command`] spawns external programs and probes for tools.
//! - [`ops`] holds the built-in operations.
//! - [`vcs`] initialises the project repository.

pub mod backend;
pub mod command;
pub mod ops;
pub mod task_runner;
pub mod vcs;

pub use backend::{ExecContext, ExecutorBackend, RealExecutorBackend};
