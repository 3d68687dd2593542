// src/supervisor/watcher.rs

//! One long-lived watcher process.

use std::fmt;
use std::path::Path;
use std::process::Stdio;
use std::time::Instant;

use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use crate::errors::TaskError;
use crate::types::CommandSpec;

/// Name and command of a watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatcherSpec {
    pub name: String,
    pub command: CommandSpec,
}

impl WatcherSpec {
    pub fn new(name: impl Into<String>, command: CommandSpec) -> Self {
        Self {
            name: name.into(),
            command,
        }
    }
}

/// How a watcher ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitInfo {
    /// Exit code, if the process exited normally.
    pub code: Option<i32>,
    /// The watcher outlived the grace period and was killed.
    pub killed: bool,
}

impl fmt::Display for ExitInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.killed, self.code) {
            (true, _) => write!(f, "killed"),
            (false, Some(code)) => write!(f, "exited with status {code}"),
            (false, None) => write!(f, "terminated by signal"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatcherStatus {
    Starting,
    Running,
    Stopped(ExitInfo),
}

#[derive(Debug)]
pub struct Watcher {
    spec: WatcherSpec,
    status: WatcherStatus,
    started_at: Option<Instant>,
    child: Option<Child>,
}

impl Watcher {
    pub fn new(spec: WatcherSpec) -> Self {
        Self {
            spec,
            status: WatcherStatus::Starting,
            started_at: None,
            child: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn status(&self) -> &WatcherStatus {
        &self.status
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    pub fn is_running(&self) -> bool {
        self.status == WatcherStatus::Running
    }

    /// Launch the process in `project_dir`, attached to the controlling terminal.
    pub fn start(&mut self, project_dir: &Path) -> Result<(), TaskError> {
        let cmd = &self.spec.command;
        debug!(watcher = %self.spec.name, command = %cmd, "starting watcher");

        let child = Command::new(&cmd.program)
            .args(&cmd.args)
            .current_dir(project_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| TaskError::ProcessSpawnFailure {
                program: cmd.program.clone(),
                message: e.to_string(),
            })?;

        info!(watcher = %self.spec.name, pid = ?child.id(), "watcher started");
        self.child = Some(child);
        self.started_at = Some(Instant::now());
        self.status = WatcherStatus::Running;
        Ok(())
    }

    /// Ask a running watcher to exit. On unix this sends SIGTERM; elsewhere
    /// it does nothing and the grace period ends in a kill.
    pub async fn terminate(&mut self) {
        let Some(child) = self.child.as_mut() else {
            return;
        };
        // Already exited and reaped; the pid may belong to someone else now.
        if matches!(child.try_wait(), Ok(Some(_))) {
            return;
        }
        if let Some(pid) = child.id() {
            send_terminate(&self.spec.name, pid).await;
        }
    }

    /// Wait until `deadline` for the process to exit on its own, then kill it.
    ///
    /// Returns `None` if the watcher never started.
    pub async fn stop(&mut self, deadline: tokio::time::Instant) -> Option<ExitInfo> {
        let child = self.child.as_mut()?;
        let name = self.spec.name.as_str();

        let info = match tokio::time::timeout_at(deadline, child.wait()).await {
            Ok(Ok(status)) => ExitInfo {
                code: status.code(),
                killed: false,
            },
            Ok(Err(e)) => {
                warn!(watcher = %name, error = %e, "failed to wait for watcher");
                ExitInfo {
                    code: None,
                    killed: false,
                }
            }
            Err(_) => {
                warn!(watcher = %name, "watcher did not exit within the grace period; killing");
                if let Err(e) = child.kill().await {
                    warn!(watcher = %name, error = %e, "failed to kill watcher");
                }
                ExitInfo {
                    code: None,
                    killed: true,
                }
            }
        };

        info!(watcher = %name, exit = %info, "watcher stopped");
        self.child = None;
        self.status = WatcherStatus::Stopped(info.clone());
        Some(info)
    }
}

#[cfg(unix)]
async fn send_terminate(name: &str, pid: u32) {
    let status = Command::new("kill")
        .args(["-TERM", &pid.to_string()])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;

    match status {
        Ok(status) if status.success() => debug!(watcher = %name, pid, "sent SIGTERM"),
        Ok(status) => warn!(watcher = %name, pid, %status, "kill -TERM did not succeed"),
        Err(e) => warn!(watcher = %name, pid, error = %e, "could not run kill"),
    }
}

#[cfg(not(unix))]
async fn send_terminate(_name: &str, _pid: u32) {}
