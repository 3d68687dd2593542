// src/config/model.rs

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

use crate::config::validate::parse_duration;
use crate::types::CommandSpec;

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [create]
/// template_url = "https://github.com/gozinc/template.git"
///
/// [run]
/// css = "static/css/tailwind.css"
/// stop_grace = "5s"
///
/// [watcher.air]
/// program = "air"
/// args = ["run"]
/// ```
///
/// All sections are optional and default to the stock zinc toolchain.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub create: CreateSection,

    #[serde(default)]
    pub run: RunSection,

    /// Watcher overrides from `[watcher.<name>]`, keyed by watcher name.
    #[serde(default)]
    pub watcher: BTreeMap<String, WatcherConfig>,
}

/// Validated configuration. Only obtainable through `TryFrom<RawConfigFile>`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub create: CreateSection,
    pub run: RunSection,
    pub watcher: BTreeMap<String, WatcherConfig>,
    stagger: Duration,
    stop_grace: Duration,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        raw: RawConfigFile,
        stagger: Duration,
        stop_grace: Duration,
    ) -> Self {
        Self {
            create: raw.create,
            run: raw.run,
            watcher: raw.watcher,
            stagger,
            stop_grace,
        }
    }

    /// Delay between consecutive watcher launches.
    pub fn stagger(&self) -> Duration {
        self.stagger
    }

    /// How long watchers get to exit on their own after a shutdown signal.
    pub fn stop_grace(&self) -> Duration {
        self.stop_grace
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        // The built-in defaults always validate.
        let raw = RawConfigFile::default();
        Self::new_unchecked(
            raw,
            Duration::from_millis(DEFAULT_STAGGER_MS),
            Duration::from_secs(DEFAULT_STOP_GRACE_SECS),
        )
    }
}

pub(crate) const DEFAULT_STAGGER_MS: u64 = 100;
pub(crate) const DEFAULT_STOP_GRACE_SECS: u64 = 5;
pub(crate) const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 30;

/// Upper bound for every configured duration.
pub const MAX_DURATION: Duration = Duration::from_secs(24 * 60 * 60);

/// `[create]` section: where the template and tools come from.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CreateSection {
    pub template_url: String,
    /// VCS client used to clone the template and initialise the repository.
    pub vcs: String,
    pub templ_package: String,
    pub air_package: String,
    /// npm package providing the CSS toolchain.
    pub tailwind_package: String,
    pub htmx_url: String,
    /// Project-relative destination of the downloaded HTTP helper script.
    pub htmx_path: String,
    /// Project-relative path of the live-reload tool's config file.
    pub air_config: String,
    /// Executable path referenced from `air_config`.
    pub air_binary: String,
    /// Duration string bounding the whole HTTP helper download.
    pub download_timeout: String,
}

impl Default for CreateSection {
    fn default() -> Self {
        Self {
            template_url: "https://github.com/gozinc/template.git".to_string(),
            vcs: "git".to_string(),
            templ_package: "github.com/a-h/templ/cmd/templ@latest".to_string(),
            air_package: "github.com/cosmtrek/air@latest".to_string(),
            tailwind_package: "tailwindcss".to_string(),
            htmx_url: "https://unpkg.com/htmx.org/dist/htmx.min.js".to_string(),
            htmx_path: "static/js/htmx.min.js".to_string(),
            air_config: ".air.toml".to_string(),
            air_binary: "./tmp/main".to_string(),
            download_timeout: format!("{DEFAULT_DOWNLOAD_TIMEOUT_SECS}s"),
        }
    }
}

impl CreateSection {
    /// Parsed `download_timeout`. A value that does not validate falls back
    /// to the default.
    pub fn download_timeout(&self) -> Duration {
        parse_duration(&self.download_timeout)
            .ok()
            .filter(|timeout| *timeout <= MAX_DURATION)
            .unwrap_or(Duration::from_secs(DEFAULT_DOWNLOAD_TIMEOUT_SECS))
    }
}

/// `[run]` section: watcher supervision settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunSection {
    /// Style-sheet output path handed to the CSS watcher.
    pub css: String,
    /// Duration string, e.g. `"100ms"`.
    pub stagger: String,
    /// Duration string, e.g. `"5s"`.
    pub stop_grace: String,
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            css: "static/css/tailwind.css".to_string(),
            stagger: format!("{DEFAULT_STAGGER_MS}ms"),
            stop_grace: format!("{DEFAULT_STOP_GRACE_SECS}s"),
        }
    }
}

/// `[watcher.<name>]` section.
///
/// A name matching a built-in watcher (`air`, `tailwind`, `templ`) replaces
/// it; any other name adds a watcher.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatcherConfig {
    /// Program to launch. Required unless `enabled = false`.
    #[serde(default)]
    pub program: Option<String>,

    #[serde(default)]
    pub args: Vec<String>,

    /// Set to `false` to drop a built-in watcher.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl WatcherConfig {
    pub fn command(&self) -> Option<CommandSpec> {
        self.program
            .as_ref()
            .map(|program| CommandSpec::new(program.clone(), self.args.iter().cloned()))
    }
}
