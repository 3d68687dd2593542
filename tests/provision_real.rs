// tests/provision_real.rs

// Drives `provision` end to end with stand-in `git`, `go`, `templ` and `npm`
// scripts placed first on PATH. Kept to one test: PATH is process-wide.
#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use tempfile::TempDir;

use zinc::config::CreateSection;
use zinc::errors::{TaskError, ZincError};
use zinc::provision::plan;
use zinc::provision::{ProvisionOptions, provision};
use zinc::types::Platform;
use zinc_test_utils::http::serve_body;
use zinc_test_utils::{init_tracing, with_timeout};

const HTMX: &str = "/* htmx */\n";

const FAKE_GIT: &str = r#"case "$1" in
  --version) echo "git version 2.47.0" ;;
  clone)
    mkdir -p .git/objects components
    printf 'module example.com/app\n\ngo 1.22\n' > go.mod
    printf 'root = "."\n[build]\n  bin = "./tmp/main"\n  cmd = "go build -o ./tmp/main ."\n  full_bin = "./tmp/main_debug"\n' > .air.toml
    ;;
esac
"#;

const FAKE_GO: &str = "";

const FAKE_TEMPL: &str = "touch components/generated_templ.go\n";

const FAKE_NPM: &str = "echo 'npm ERR! code E404' >&2\nexit 1\n";

/// Write an executable `name` into `bin` that appends its argv to `log` and
/// then runs `body`.
fn fake_tool(bin: &Path, log: &Path, name: &str, body: &str) {
    let path = bin.join(name);
    let script = format!(
        "#!/bin/sh\necho \"{name} $*\" >> '{}'\n{body}exit 0\n",
        log.display()
    );
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

#[tokio::test]
async fn test_provision_runs_real_tools_and_refuses_to_overwrite() {
    init_tracing();

    let tools = TempDir::new().unwrap();
    let bin = tools.path().join("bin");
    std::fs::create_dir(&bin).unwrap();
    let log = tools.path().join("invocations.log");
    fake_tool(&bin, &log, "git", FAKE_GIT);
    fake_tool(&bin, &log, "go", FAKE_GO);
    fake_tool(&bin, &log, "templ", FAKE_TEMPL);
    fake_tool(&bin, &log, "npm", FAKE_NPM);

    let path = std::env::var("PATH").unwrap_or_default();
    // SAFETY: this binary holds a single test, and PATH is set before any
    // child process is spawned.
    unsafe { std::env::set_var("PATH", format!("{}:{path}", bin.display())) };

    let create = CreateSection {
        htmx_url: serve_body("/htmx.min.js", HTMX).await,
        ..CreateSection::default()
    };
    let options = ProvisionOptions {
        skip_version_control: false,
        platform: Platform::Windows,
        style_tooling: true,
        http_helper: true,
    };

    let workspace = TempDir::new().unwrap();
    let project = workspace.path().join("my_app");

    let report = with_timeout(provision(&project, &options, &create))
        .await
        .unwrap();

    assert!(report.is_completed(), "report:\n{report}");
    assert_eq!(report.tasks.len(), 11);

    // The failing CSS toolchain install is only a warning.
    let warnings: Vec<&str> = report.warnings().map(|t| t.name.as_str()).collect();
    assert_eq!(warnings, vec![plan::INSTALL_TAILWIND]);
    assert_eq!(
        report.task(plan::INSTALL_TAILWIND).unwrap().error(),
        Some(&TaskError::ProcessExitFailure {
            program: "npm".to_string(),
            code: 1
        })
    );

    // Template metadata stripped, generated code and helper script present.
    assert!(!project.join(".git").exists());
    assert!(project.join("components/generated_templ.go").is_file());
    assert_eq!(
        std::fs::read_to_string(project.join("static/js/htmx.min.js")).unwrap(),
        HTMX
    );

    let air = std::fs::read_to_string(project.join(".air.toml")).unwrap();
    assert_eq!(air.matches("./tmp/main.exe").count(), 2, "{air}");
    assert!(air.contains("./tmp/main_debug"));

    let invocations = std::fs::read_to_string(&log).unwrap();
    let lines: Vec<&str> = invocations.lines().collect();
    assert!(lines[0].starts_with("git clone "), "{invocations}");
    for expected in [
        "go mod download",
        "go mod tidy",
        "templ generate",
        "npm -g i tailwindcss",
        "git --version",
    ] {
        assert!(lines.contains(&expected), "missing `{expected}` in:\n{invocations}");
    }
    assert_eq!(&lines[lines.len() - 2..], ["git init", "git add ."]);

    // A second run into the now populated directory touches nothing.
    let rerun = provision(&project, &options, &create).await;
    assert!(matches!(rerun, Err(ZincError::PathConflict(_))));
    assert_eq!(std::fs::read_to_string(&log).unwrap(), invocations);
}
