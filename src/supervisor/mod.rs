// src/supervisor/mod.rs

//! Watch supervisor: `zinc run`.
//!
//! Starts the project's watchers, waits for a shutdown signal, and stops all
//! of them together. No watcher outlives [`Supervisor::run_until`].

pub mod signal;
pub mod watcher;

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{error, info};

use crate::config::ConfigFile;
use crate::config::model::MAX_DURATION;
use crate::errors::{Result, ZincError};
use crate::types::CommandSpec;

pub use signal::ShutdownSignal;
pub use watcher::{ExitInfo, Watcher, WatcherSpec, WatcherStatus};

/// Built-in watchers, in launch order: live reload, CSS build, templates.
pub fn default_watchers(css: &str) -> Vec<WatcherSpec> {
    vec![
        WatcherSpec::new("air", CommandSpec::new("air", ["run"])),
        WatcherSpec::new(
            "tailwind",
            CommandSpec::new("tailwindcss", ["build", "-o", css, "--watch"]),
        ),
        WatcherSpec::new("templ", CommandSpec::new("templ", ["generate", "-watch"])),
    ]
}

/// Built-in watchers with `[watcher.<name>]` overrides applied.
pub fn watcher_specs(cfg: &ConfigFile, css: &str) -> Vec<WatcherSpec> {
    let mut specs = default_watchers(css);

    for (name, over) in cfg.watcher.iter() {
        let existing = specs.iter().position(|s| &s.name == name);
        match (existing, over.enabled, over.command()) {
            (Some(idx), false, _) => {
                specs.remove(idx);
            }
            (Some(idx), true, Some(command)) => specs[idx].command = command,
            (None, true, Some(command)) => specs.push(WatcherSpec::new(name.clone(), command)),
            _ => {}
        }
    }

    specs
}

#[derive(Debug)]
pub struct Supervisor {
    project_dir: PathBuf,
    watchers: Vec<Watcher>,
    stagger: Duration,
    stop_grace: Duration,
}

impl Supervisor {
    pub fn new(
        project_dir: impl Into<PathBuf>,
        specs: Vec<WatcherSpec>,
        stagger: Duration,
        stop_grace: Duration,
    ) -> Self {
        Self {
            project_dir: project_dir.into(),
            watchers: specs.into_iter().map(Watcher::new).collect(),
            stagger,
            stop_grace,
        }
    }

    pub fn watchers(&self) -> &[Watcher] {
        &self.watchers
    }

    /// Start every watcher, one after another with a short stagger.
    ///
    /// Best effort: a watcher that fails to launch is reported and skipped.
    /// Returns how many are running.
    pub async fn start_all(&mut self) -> usize {
        let mut started = 0;
        for (idx, watcher) in self.watchers.iter_mut().enumerate() {
            if idx > 0 && !self.stagger.is_zero() {
                tokio::time::sleep(self.stagger).await;
            }
            match watcher.start(&self.project_dir) {
                Ok(()) => started += 1,
                Err(e) => error!(watcher = %watcher.name(), error = %e, "failed to start watcher"),
            }
        }
        info!(started, total = self.watchers.len(), "watchers launched");
        started
    }

    /// Wait for `shutdown`, then stop every running watcher.
    ///
    /// Fails with `NoWatchersStarted` without waiting if nothing is running.
    pub async fn run_until<F>(&mut self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        if !self.watchers.iter().any(Watcher::is_running) {
            return Err(ZincError::NoWatchersStarted);
        }

        shutdown.await;
        self.stop_all().await;
        Ok(())
    }

    /// Ask every watcher to stop, give them one shared grace period to exit,
    /// then kill stragglers.
    pub async fn stop_all(&mut self) {
        for watcher in self.watchers.iter_mut() {
            watcher.terminate().await;
        }

        let now = tokio::time::Instant::now();
        let deadline = now
            .checked_add(self.stop_grace)
            .unwrap_or_else(|| now + MAX_DURATION);
        for watcher in self.watchers.iter_mut() {
            watcher.stop(deadline).await;
        }
    }
}

/// Supervise the watchers of the project in `project_dir` until a shutdown
/// signal arrives.
pub async fn supervise(project_dir: &Path, cfg: &ConfigFile, css: &str) -> Result<()> {
    let specs = watcher_specs(cfg, css);
    info!(project = %project_dir.display(), watchers = specs.len(), "supervising watchers");

    let shutdown = ShutdownSignal::install();
    let mut supervisor = Supervisor::new(project_dir, specs, cfg.stagger(), cfg.stop_grace());
    supervisor.start_all().await;
    supervisor.run_until(shutdown.recv()).await
}
