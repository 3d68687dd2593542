// src/exec/ops.rs

//! Built-in operations that do not shell out: directory removal, file
//! download, and the platform path fix-up.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use regex::{Captures, Regex};
use tracing::{debug, info, warn};

use crate::errors::TaskError;
use crate::fs::FileSystem;

/// Recursively remove `path`. A missing directory is not an error.
pub async fn remove_dir(fs: Arc<dyn FileSystem>, path: PathBuf) -> Result<(), TaskError> {
    tokio::task::spawn_blocking(move || fs.remove_dir_all(&path))
        .await
        .map_err(|e| TaskError::Io(format!("remove task did not complete: {e}")))?
        .map_err(|e| TaskError::Io(format!("{e:#}")))
}

/// Download `url` and store the body at `dest`, creating parent directories.
///
/// `timeout` covers the whole request, body included.
pub async fn download_file(
    fs: &dyn FileSystem,
    url: &str,
    dest: &Path,
    timeout: Duration,
) -> Result<(), TaskError> {
    let download_err = |e: reqwest::Error| TaskError::Download {
        url: url.to_string(),
        message: e.to_string(),
    };

    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("zinc/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(download_err)?;

    debug!(url, dest = %dest.display(), ?timeout, "downloading file");
    let body = client
        .get(url)
        .send()
        .await
        .and_then(|resp| resp.error_for_status())
        .map_err(download_err)?
        .bytes()
        .await
        .map_err(download_err)?;

    fs.write(dest, &body)
        .map_err(|e| TaskError::Io(format!("{e:#}")))?;
    info!(url, dest = %dest.display(), bytes = body.len(), "download stored");
    Ok(())
}

/// Append `suffix` to every literal occurrence of `executable` in `file`.
///
/// Occurrences that already carry the suffix are left alone, so applying the
/// fix-up twice changes nothing. An occurrence only counts when it ends at a
/// word boundary (`./tmp/main` matches in `./tmp/main .` but not in
/// `./tmp/main_test`).
///
/// Returns the number of occurrences rewritten.
pub fn rewrite_executable_paths(
    fs: &dyn FileSystem,
    file: &Path,
    executable: &str,
    suffix: &str,
) -> Result<usize, TaskError> {
    if suffix.is_empty() {
        return Ok(0);
    }

    let contents = fs
        .read_to_string(file)
        .map_err(|e| TaskError::Io(format!("{e:#}")))?;

    let pattern = format!(
        r"{}(?P<suffix>{})?\b",
        regex::escape(executable),
        regex::escape(suffix)
    );
    let re = Regex::new(&pattern)
        .map_err(|e| TaskError::Io(format!("invalid executable pattern: {e}")))?;

    let mut rewritten = 0usize;
    let updated = re.replace_all(&contents, |caps: &Captures<'_>| {
        if caps.name("suffix").is_some() {
            caps[0].to_string()
        } else {
            rewritten += 1;
            format!("{executable}{suffix}")
        }
    });

    if rewritten == 0 {
        warn!(
            file = %file.display(),
            executable,
            "no unsuffixed executable references found; nothing to rewrite"
        );
        return Ok(0);
    }

    fs.write(file, updated.as_bytes())
        .map_err(|e| TaskError::Io(format!("{e:#}")))?;
    info!(file = %file.display(), rewritten, suffix, "rewrote executable paths");
    Ok(rewritten)
}
