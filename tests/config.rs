// tests/config.rs

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use tempfile::{NamedTempFile, TempDir};

use zinc::config::{
    ConfigFile, load_and_validate, load_or_default, load_or_default_in, parse_duration,
};
use zinc::errors::ZincError;
use zinc::fs::mock::MockFileSystem;
use zinc::supervisor::watcher_specs;

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

fn expect_config_error(contents: &str, needle: &str) {
    let file = config_file(contents);
    match load_and_validate(file.path()) {
        Err(ZincError::ConfigError(msg)) => {
            assert!(msg.contains(needle), "'{msg}' should mention '{needle}'")
        }
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn test_empty_file_yields_defaults() {
    let file = config_file("");
    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.create.vcs, "git");
    assert_eq!(cfg.create.air_config, ".air.toml");
    assert_eq!(cfg.create.air_binary, "./tmp/main");
    assert_eq!(cfg.run.css, "static/css/tailwind.css");
    assert_eq!(cfg.stagger(), Duration::from_millis(100));
    assert_eq!(cfg.stop_grace(), Duration::from_secs(5));
    assert!(cfg.watcher.is_empty());
}

#[test]
fn test_partial_sections_keep_other_defaults() {
    let file = config_file(
        r#"
[create]
template_url = "https://example.com/template.git"

[run]
stop_grace = "250ms"
"#,
    );
    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.create.template_url, "https://example.com/template.git");
    assert_eq!(cfg.create.tailwind_package, "tailwindcss");
    assert_eq!(cfg.stop_grace(), Duration::from_millis(250));
    assert_eq!(cfg.stagger(), Duration::from_millis(100));
}

#[test]
fn test_unknown_keys_are_rejected() {
    let file = config_file(
        r#"
[create]
template = "typo"
"#,
    );
    assert!(matches!(
        load_and_validate(file.path()),
        Err(ZincError::TomlError(_))
    ));
}

#[test]
fn test_invalid_values_are_config_errors() {
    expect_config_error("[create]\ntemplate_url = \"\"\n", "template_url");
    expect_config_error("[create]\nair_config = \"../outside.toml\"\n", "air_config");
    expect_config_error("[create]\nhtmx_path = \"/etc/htmx.js\"\n", "htmx_path");
    expect_config_error("[run]\nstagger = \"fast\"\n", "stagger");
    expect_config_error("[run]\nstop_grace = \"5 fortnights\"\n", "stop_grace");
    expect_config_error("[watcher.extra]\nargs = [\"--watch\"]\n", "watcher.extra");
}

#[test]
fn test_watcher_overrides_replace_disable_and_add() {
    let file = config_file(
        r#"
[watcher.air]
program = "air"
args = ["-c", ".air.dev.toml"]

[watcher.templ]
enabled = false

[watcher.sqlc]
program = "sqlc"
args = ["generate", "--watch"]
"#,
    );
    let cfg = load_and_validate(file.path()).unwrap();
    let specs = watcher_specs(&cfg, "public/app.css");

    let names: Vec<&str> = specs.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["air", "tailwind", "sqlc"]);
    assert_eq!(specs[0].command.args, ["-c", ".air.dev.toml"]);
    assert_eq!(
        specs[1].command.args,
        ["build", "-o", "public/app.css", "--watch"]
    );
    assert_eq!(specs[2].command.program, "sqlc");
}

#[test]
fn test_default_watchers() {
    let specs = watcher_specs(&ConfigFile::default(), "static/css/tailwind.css");

    let commands: Vec<String> = specs.iter().map(|s| s.command.to_string()).collect();
    assert_eq!(
        commands,
        vec![
            "air run",
            "tailwindcss build -o static/css/tailwind.css --watch",
            "templ generate -watch",
        ]
    );
}

#[test]
fn test_load_or_default_prefers_explicit_then_project_file() {
    let dir = TempDir::new().unwrap();
    let project_file = dir.path().join("zinc.toml");

    // Nothing on disk: defaults.
    let cfg = load_or_default(None, Some(project_file.as_path())).unwrap();
    assert_eq!(cfg.run.css, "static/css/tailwind.css");

    std::fs::write(&project_file, "[run]\ncss = \"public/site.css\"\n").unwrap();
    let cfg = load_or_default(None, Some(project_file.as_path())).unwrap();
    assert_eq!(cfg.run.css, "public/site.css");

    let explicit = config_file("[run]\ncss = \"assets/explicit.css\"\n");
    let cfg = load_or_default(Some(explicit.path()), Some(project_file.as_path())).unwrap();
    assert_eq!(cfg.run.css, "assets/explicit.css");

    // An explicitly named file must exist.
    let missing = dir.path().join("nope.toml");
    assert!(matches!(
        load_or_default(Some(missing.as_path()), None),
        Err(ZincError::IoError(_))
    ));
}

#[test]
fn test_parse_duration_units() {
    assert_eq!(parse_duration("250ms"), Ok(Duration::from_millis(250)));
    assert_eq!(parse_duration(" 3s "), Ok(Duration::from_secs(3)));
    assert_eq!(parse_duration("2m"), Ok(Duration::from_secs(120)));
    assert_eq!(parse_duration("1h"), Ok(Duration::from_secs(3600)));
    assert!(parse_duration("").is_err());
    assert!(parse_duration("10").is_err());
    assert!(parse_duration("10d").is_err());
}

#[test]
fn test_out_of_range_durations_are_rejected() {
    assert!(parse_duration("6000000000000000h").is_err());
    assert!(parse_duration("18446744073709551615m").is_err());
    assert!(parse_duration("99999999999999999999s").is_err());

    expect_config_error("[run]\nstop_grace = \"18446744073709551615s\"\n", "stop_grace");
    expect_config_error("[run]\nstagger = \"25h\"\n", "stagger");
    expect_config_error("[create]\ndownload_timeout = \"2000m\"\n", "download_timeout");

    let file = config_file("[run]\nstop_grace = \"24h\"\n");
    let cfg = load_and_validate(file.path()).unwrap();
    assert_eq!(cfg.stop_grace(), Duration::from_secs(24 * 60 * 60));
}

#[test]
fn test_download_timeout_setting() {
    assert_eq!(
        ConfigFile::default().create.download_timeout(),
        Duration::from_secs(30)
    );

    let file = config_file("[create]\ndownload_timeout = \"45s\"\n");
    let cfg = load_and_validate(file.path()).unwrap();
    assert_eq!(cfg.create.download_timeout(), Duration::from_secs(45));
}

#[test]
fn test_project_config_lookup_goes_through_filesystem() {
    let fs = MockFileSystem::new();
    fs.add_dir("/proj/zinc.toml");

    // A directory named like the config file is not a config file.
    let cfg = load_or_default_in(&fs, None, Some(Path::new("/proj/zinc.toml"))).unwrap();
    assert_eq!(cfg.run.css, "static/css/tailwind.css");
}
