// src/provision/plan.rs

//! The fixed provisioning graph, parameterised by [`ProvisionOptions`].
//!
//! ```text
//! clone-template
//!   ├── strip-vcs-metadata
//!   ├── download-deps ── tidy-deps
//!   ├── install-templ ── generate-templ
//!   ├── install-air
//!   ├── install-tailwind      (style tooling)
//!   └── install-htmx          (http helper)
//!         └── fix-platform-paths (windows) ── init-vcs (unless skipped)
//! ```
//!
//! The last two tasks wait for everything before them, since both touch
//! files the other tasks may still be writing.

use std::path::PathBuf;

use crate::config::CreateSection;
use crate::dag::{TaskGraph, TaskSpec};
use crate::errors::Result;
use crate::types::{CommandSpec, FailurePolicy, Operation, Platform};

use super::options::ProvisionOptions;

pub const CLONE_TEMPLATE: &str = "clone-template";
pub const STRIP_VCS_METADATA: &str = "strip-vcs-metadata";
pub const DOWNLOAD_DEPS: &str = "download-deps";
pub const TIDY_DEPS: &str = "tidy-deps";
pub const INSTALL_TEMPL: &str = "install-templ";
pub const GENERATE_TEMPL: &str = "generate-templ";
pub const INSTALL_AIR: &str = "install-air";
pub const INSTALL_TAILWIND: &str = "install-tailwind";
pub const INSTALL_HTMX: &str = "install-htmx";
pub const FIX_PLATFORM_PATHS: &str = "fix-platform-paths";
pub const INIT_VCS: &str = "init-vcs";

/// Build and validate the task graph for one `zinc create` run.
pub fn build_task_graph(options: &ProvisionOptions, create: &CreateSection) -> Result<TaskGraph> {
    TaskGraph::new(plan_tasks(options, create))
}

/// Task specs in plan order, before validation.
pub fn plan_tasks(options: &ProvisionOptions, create: &CreateSection) -> Vec<TaskSpec> {
    use FailurePolicy::{Advisory, Fatal};

    let mut tasks = vec![
        TaskSpec::new(
            CLONE_TEMPLATE,
            command(&create.vcs, ["clone", create.template_url.as_str(), "."]),
            Fatal,
        ),
        TaskSpec::new(
            STRIP_VCS_METADATA,
            Operation::RemoveDir(PathBuf::from(".git")),
            Advisory,
        )
        .after(CLONE_TEMPLATE),
        TaskSpec::new(DOWNLOAD_DEPS, command("go", ["mod", "download"]), Fatal)
            .after(CLONE_TEMPLATE),
        TaskSpec::new(TIDY_DEPS, command("go", ["mod", "tidy"]), Fatal).after(DOWNLOAD_DEPS),
        TaskSpec::new(
            INSTALL_TEMPL,
            command("go", ["install", create.templ_package.as_str()]),
            Advisory,
        )
        .after(CLONE_TEMPLATE),
        TaskSpec::new(GENERATE_TEMPL, command("templ", ["generate"]), Fatal)
            .after(CLONE_TEMPLATE)
            .after(INSTALL_TEMPL),
        TaskSpec::new(
            INSTALL_AIR,
            command("go", ["install", create.air_package.as_str()]),
            Advisory,
        )
        .after(CLONE_TEMPLATE),
    ];

    if options.style_tooling {
        tasks.push(
            TaskSpec::new(
                INSTALL_TAILWIND,
                command("npm", ["-g", "i", create.tailwind_package.as_str()]),
                Advisory,
            )
            .after(CLONE_TEMPLATE),
        );
    }

    if options.http_helper {
        tasks.push(
            TaskSpec::new(
                INSTALL_HTMX,
                Operation::Download {
                    url: create.htmx_url.clone(),
                    dest: PathBuf::from(&create.htmx_path),
                    timeout: create.download_timeout(),
                },
                Advisory,
            )
            .after(CLONE_TEMPLATE),
        );
    }

    if options.platform == Platform::Windows {
        let fixup = TaskSpec::new(
            FIX_PLATFORM_PATHS,
            Operation::RewriteExecutablePaths {
                file: PathBuf::from(&create.air_config),
                executable: create.air_binary.clone(),
                suffix: options.platform.executable_suffix().to_string(),
            },
            Advisory,
        );
        tasks.push(after_all(fixup, &tasks));
    }

    if !options.skip_version_control {
        let init = TaskSpec::new(
            INIT_VCS,
            Operation::InitRepository {
                vcs: create.vcs.clone(),
            },
            Advisory,
        );
        tasks.push(after_all(init, &tasks));
    }

    tasks
}

fn command<const N: usize>(program: &str, args: [&str; N]) -> Operation {
    Operation::Command(CommandSpec::new(program, args))
}

fn after_all(spec: TaskSpec, before: &[TaskSpec]) -> TaskSpec {
    before.iter().fold(spec, |spec, t| spec.after(t.name.clone()))
}
