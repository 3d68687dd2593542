// src/exec/command.rs

//! External command adapter.

use std::collections::VecDeque;
use std::path::Path;
use std::process::Stdio;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, warn};

use crate::errors::TaskError;
use crate::types::CommandSpec;

/// How many trailing stderr lines are kept for the failure log.
const STDERR_TAIL: usize = 20;

/// Run `spec` in `cwd` to completion.
///
/// Output is consumed line by line and logged at debug level; on a non-zero
/// exit the tail of stderr is logged at warn level.
pub async fn run_command(spec: &CommandSpec, cwd: &Path) -> Result<(), TaskError> {
    debug!(cmd = %spec, cwd = %cwd.display(), "spawning process");

    let mut child = Command::new(&spec.program)
        .args(&spec.args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| TaskError::ProcessSpawnFailure {
            program: spec.program.clone(),
            message: e.to_string(),
        })?;

    let stdout_task = child.stdout.take().map(|stdout| {
        let program = spec.program.clone();
        tokio::spawn(async move {
            let mut reader = BufReader::new(stdout);
            let mut buf = Vec::new();
            while let Some(line) = next_line(&mut reader, &mut buf).await {
                debug!(program = %program, "stdout: {}", line);
            }
        })
    });

    let stderr_task = child.stderr.take().map(|stderr| {
        let program = spec.program.clone();
        tokio::spawn(async move {
            let mut tail = VecDeque::with_capacity(STDERR_TAIL);
            let mut reader = BufReader::new(stderr);
            let mut buf = Vec::new();
            while let Some(line) = next_line(&mut reader, &mut buf).await {
                debug!(program = %program, "stderr: {}", line);
                if tail.len() == STDERR_TAIL {
                    tail.pop_front();
                }
                tail.push_back(line);
            }
            tail
        })
    });

    let status = child.wait().await.map_err(|e| TaskError::ProcessSpawnFailure {
        program: spec.program.clone(),
        message: format!("waiting for process: {e}"),
    })?;

    if let Some(handle) = stdout_task {
        let _ = handle.await;
    }
    let stderr_tail = match stderr_task {
        Some(handle) => handle.await.unwrap_or_default(),
        None => VecDeque::new(),
    };

    if status.success() {
        return Ok(());
    }

    let code = status.code().unwrap_or(-1);
    for line in &stderr_tail {
        warn!(program = %spec.program, exit_code = code, "{}", line);
    }
    Err(TaskError::ProcessExitFailure {
        program: spec.program.clone(),
        code,
    })
}

/// Read one line of raw output, decoded lossily.
///
/// The pipe is drained until EOF even when a line is not valid UTF-8, so the
/// child never sees a closed pipe. A read error also ends the stream.
async fn next_line<R>(reader: &mut R, buf: &mut Vec<u8>) -> Option<String>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    match reader.read_until(b'\n', buf).await {
        Ok(0) => None,
        Ok(_) => {
            let line = String::from_utf8_lossy(buf.as_slice());
            Some(line.trim_end_matches(['\n', '\r']).to_string())
        }
        Err(e) => {
            debug!(error = %e, "output stream read failed");
            None
        }
    }
}

/// Check that a tool is usable by running its version command.
///
/// Any failure, whether the binary is missing or it exits non-zero, counts as
/// "not installed".
pub async fn probe(spec: &CommandSpec, cwd: &Path) -> bool {
    let status = Command::new(&spec.program)
        .args(&spec.args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;

    match status {
        Ok(status) => status.success(),
        Err(e) => {
            debug!(program = %spec.program, error = %e, "probe could not launch tool");
            false
        }
    }
}
