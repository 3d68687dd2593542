// src/config/validate.rs

use std::path::{Component, Path};
use std::time::Duration;

use crate::config::model::{ConfigFile, MAX_DURATION, RawConfigFile};
use crate::errors::{Result, ZincError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::ZincError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_create_section(&raw)?;
        let (stagger, stop_grace) = validate_run_section(&raw)?;
        validate_watchers(&raw)?;
        Ok(ConfigFile::new_unchecked(raw, stagger, stop_grace))
    }
}

fn validate_create_section(cfg: &RawConfigFile) -> Result<()> {
    let create = &cfg.create;

    let required = [
        ("template_url", &create.template_url),
        ("vcs", &create.vcs),
        ("templ_package", &create.templ_package),
        ("air_package", &create.air_package),
        ("tailwind_package", &create.tailwind_package),
        ("htmx_url", &create.htmx_url),
        ("air_binary", &create.air_binary),
    ];
    for (key, value) in required {
        ensure_non_empty("create", key, value)?;
    }

    ensure_project_relative("create", "htmx_path", &create.htmx_path)?;
    ensure_project_relative("create", "air_config", &create.air_config)?;
    bounded_duration("create", "download_timeout", &create.download_timeout)?;
    Ok(())
}

fn validate_run_section(cfg: &RawConfigFile) -> Result<(Duration, Duration)> {
    let run = &cfg.run;
    ensure_project_relative("run", "css", &run.css)?;

    let stagger = bounded_duration("run", "stagger", &run.stagger)?;
    let stop_grace = bounded_duration("run", "stop_grace", &run.stop_grace)?;
    Ok((stagger, stop_grace))
}

fn validate_watchers(cfg: &RawConfigFile) -> Result<()> {
    for (name, watcher) in cfg.watcher.iter() {
        if name.trim().is_empty() {
            return Err(ZincError::ConfigError(
                "watcher names must not be empty".to_string(),
            ));
        }
        if !watcher.enabled {
            continue;
        }
        match watcher.program.as_deref() {
            Some(program) if !program.trim().is_empty() => {}
            _ => {
                return Err(ZincError::ConfigError(format!(
                    "[watcher.{name}] needs a non-empty `program` (or `enabled = false`)"
                )));
            }
        }
    }
    Ok(())
}

fn ensure_non_empty(section: &str, key: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ZincError::ConfigError(format!(
            "[{section}].{key} must not be empty"
        )));
    }
    Ok(())
}

/// Paths written by zinc must stay inside the project directory.
fn ensure_project_relative(section: &str, key: &str, value: &str) -> Result<()> {
    ensure_non_empty(section, key, value)?;

    let path = Path::new(value);
    let escapes = path.components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if escapes || path.is_absolute() {
        return Err(ZincError::ConfigError(format!(
            "[{section}].{key} must be a relative path inside the project (got '{value}')"
        )));
    }
    Ok(())
}

/// Parse a simple duration string like `"5s"`, `"250ms"`, `"1m"`, `"2h"`.
pub fn parse_duration(s: &str) -> std::result::Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    // Find the boundary between digits and suffix.
    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| format!("duration '{s}' is missing a unit suffix"))?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{num_part}': {e}"))?;
    let unit = unit_part.trim().to_lowercase();

    let parsed = match unit.as_str() {
        "ms" => Some(Duration::from_millis(value)),
        "s" => Some(Duration::from_secs(value)),
        "m" => value.checked_mul(60).map(Duration::from_secs),
        "h" => value.checked_mul(60 * 60).map(Duration::from_secs),
        _ => {
            return Err(format!(
                "unsupported duration unit '{unit}'; expected ms, s, m, or h"
            ));
        }
    };
    parsed.ok_or_else(|| format!("duration '{s}' is out of range"))
}

/// Parse a configured duration and cap it at [`MAX_DURATION`].
fn bounded_duration(section: &str, key: &str, value: &str) -> Result<Duration> {
    let parsed = parse_duration(value)
        .map_err(|e| ZincError::ConfigError(format!("[{section}].{key}: {e}")))?;
    if parsed > MAX_DURATION {
        return Err(ZincError::ConfigError(format!(
            "[{section}].{key}: '{value}' exceeds the 24h limit"
        )));
    }
    Ok(parsed)
}
