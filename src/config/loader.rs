// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;
use crate::fs::{FileSystem, RealFileSystem};

/// File name looked up in the project directory by `zinc run`.
pub const DEFAULT_CONFIG_FILE: &str = "zinc.toml";

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Load `explicit` if given; otherwise `fallback` if that file exists;
/// otherwise the built-in defaults.
///
/// An explicitly named file that does not exist is an error.
pub fn load_or_default(explicit: Option<&Path>, fallback: Option<&Path>) -> Result<ConfigFile> {
    load_or_default_in(&RealFileSystem, explicit, fallback)
}

/// [`load_or_default`] with the fallback lookup going through `fs`.
pub fn load_or_default_in(
    fs: &dyn FileSystem,
    explicit: Option<&Path>,
    fallback: Option<&Path>,
) -> Result<ConfigFile> {
    if let Some(path) = explicit {
        debug!(path = %path.display(), "loading config");
        return load_and_validate(path);
    }

    match fallback {
        Some(path) if fs.is_file(path) => {
            debug!(path = %path.display(), "loading project config");
            load_and_validate(path)
        }
        _ => {
            debug!("no config file; using built-in defaults");
            Ok(ConfigFile::default())
        }
    }
}

/// Default config location for a project directory.
pub fn default_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(DEFAULT_CONFIG_FILE)
}
