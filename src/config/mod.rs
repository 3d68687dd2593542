// src/config/mod.rs

//! TOML configuration for `zinc create` and `zinc run`.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{DEFAULT_CONFIG_FILE, load_and_validate, load_or_default, load_or_default_in};
pub use model::{ConfigFile, CreateSection, RawConfigFile, RunSection, WatcherConfig};
pub use validate::parse_duration;
