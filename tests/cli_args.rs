// tests/cli_args.rs

use std::path::PathBuf;

use clap::Parser;
use tracing::Level;

use zinc::cli::{CliArgs, Command, LogLevel};
use zinc::logging::resolve_level;
use zinc::types::Platform;

#[test]
fn test_create_defaults() {
    let args = CliArgs::try_parse_from(["zinc", "create"]).unwrap();
    let Command::Create(create) = args.command else {
        panic!("expected create");
    };

    assert_eq!(create.path, PathBuf::from("my_app"));
    let options = create.options();
    assert!(!options.skip_version_control);
    assert!(options.style_tooling);
    assert!(!options.http_helper);
    assert_eq!(options.platform, Platform::host());
}

#[test]
fn test_create_switches_map_to_options() {
    let args = CliArgs::try_parse_from([
        "zinc",
        "create",
        "site",
        "--no-git",
        "--platform",
        "windows",
        "--no-style-tooling",
        "--http-helper",
        "--log-level",
        "debug",
    ])
    .unwrap();
    assert!(matches!(args.log_level, Some(LogLevel::Debug)));

    let Command::Create(create) = args.command else {
        panic!("expected create");
    };
    let options = create.options();
    assert_eq!(create.path, PathBuf::from("site"));
    assert!(options.skip_version_control);
    assert_eq!(options.platform, Platform::Windows);
    assert!(!options.style_tooling);
    assert!(options.http_helper);
}

#[test]
fn test_unrecognised_platform_is_rejected() {
    assert!(CliArgs::try_parse_from(["zinc", "create", "--platform", "beos"]).is_err());
    assert!(CliArgs::try_parse_from(["zinc", "create", "--log-level", "loud"]).is_err());
}

#[test]
fn test_run_arguments() {
    let args = CliArgs::try_parse_from(["zinc", "run", "--css", "public/app.css"]).unwrap();
    let Command::Run(run) = args.command else {
        panic!("expected run");
    };
    assert_eq!(run.project_dir, PathBuf::from("."));
    assert_eq!(run.css.as_deref(), Some("public/app.css"));
    assert!(run.config.is_none());
}

#[test]
fn test_log_level_priority() {
    assert_eq!(resolve_level(Some(LogLevel::Trace), Some("error")), Level::TRACE);
    assert_eq!(resolve_level(None, Some("warning")), Level::WARN);
    assert_eq!(resolve_level(None, Some("nonsense")), Level::INFO);
    assert_eq!(resolve_level(None, None), Level::INFO);
}
