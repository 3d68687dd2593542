use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

/// Target platform for the generated project.
///
/// Only affects the platform path fix-up: on Windows the watch-tool config
/// must reference the built binary with an `.exe` suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Posix,
    Windows,
}

impl Platform {
    /// Platform of the machine running `zinc`.
    pub fn host() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Posix
        }
    }

    /// Suffix appended to executable file names on this platform.
    pub fn executable_suffix(self) -> &'static str {
        match self {
            Platform::Posix => "",
            Platform::Windows => ".exe",
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Platform::host()
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "posix" => Ok(Platform::Posix),
            "windows" => Ok(Platform::Windows),
            other => Err(format!(
                "invalid platform: {other} (expected \"posix\" or \"windows\")"
            )),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Posix => write!(f, "posix"),
            Platform::Windows => write!(f, "windows"),
        }
    }
}

/// What a task failure means for the rest of the run.
///
/// - `Fatal`: the run is aborted and nothing depending on the task starts.
/// - `Advisory`: the failure is reported, dependents proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    Fatal,
    Advisory,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Fatal => write!(f, "fatal"),
            FailurePolicy::Advisory => write!(f, "advisory"),
        }
    }
}

/// An external program plus its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommandSpec {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new<P, I, S>(program: P, args: I) -> Self
    where
        P: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// The unit of work a provisioning task performs.
///
/// Paths are relative to the project directory; every operation runs with
/// the project directory as its working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Run an external program to completion.
    Command(CommandSpec),
    /// Recursively delete a directory inside the project.
    RemoveDir(PathBuf),
    /// Fetch `url` over HTTP and store the body at `dest`, giving up after
    /// `timeout`.
    Download {
        url: String,
        dest: PathBuf,
        timeout: Duration,
    },
    /// Append `suffix` to every literal occurrence of `executable` in `file`.
    RewriteExecutablePaths {
        file: PathBuf,
        executable: String,
        suffix: String,
    },
    /// Probe the VCS client, then initialise a repository and stage all files.
    InitRepository { vcs: String },
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Command(cmd) => write!(f, "{cmd}"),
            Operation::RemoveDir(path) => write!(f, "remove {}", path.display()),
            Operation::Download { url, dest, .. } => {
                write!(f, "download {url} -> {}", dest.display())
            }
            Operation::RewriteExecutablePaths {
                file,
                executable,
                suffix,
            } => write!(
                f,
                "rewrite {executable} -> {executable}{suffix} in {}",
                file.display()
            ),
            Operation::InitRepository { vcs } => write!(f, "{vcs} init && {vcs} add ."),
        }
    }
}
