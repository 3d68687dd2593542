// tests/provision_plan.rs

use proptest::prelude::*;

use zinc::config::CreateSection;
use zinc::dag::TaskGraph;
use zinc::provision::ProvisionOptions;
use zinc::provision::plan::{self, build_task_graph};
use zinc::types::{FailurePolicy, Operation, Platform};

fn options(skip_vcs: bool, platform: Platform, style: bool, http: bool) -> ProvisionOptions {
    ProvisionOptions {
        skip_version_control: skip_vcs,
        platform,
        style_tooling: style,
        http_helper: http,
    }
}

fn graph_for(opts: &ProvisionOptions) -> TaskGraph {
    build_task_graph(opts, &CreateSection::default()).expect("plan must always validate")
}

fn platform_strategy() -> impl Strategy<Value = Platform> {
    prop_oneof![Just(Platform::Posix), Just(Platform::Windows)]
}

proptest! {
    #[test]
    fn test_every_option_combination_yields_single_rooted_dag(
        skip_vcs in any::<bool>(),
        platform in platform_strategy(),
        style in any::<bool>(),
        http in any::<bool>(),
    ) {
        let graph = graph_for(&options(skip_vcs, platform, style, http));

        prop_assert_eq!(graph.roots(), vec![plan::CLONE_TEMPLATE]);
        prop_assert_eq!(
            graph.spec(plan::CLONE_TEMPLATE).map(|s| s.policy),
            Some(FailurePolicy::Fatal)
        );

        let names: Vec<&str> = graph.tasks().collect();
        prop_assert_eq!(names.contains(&plan::INIT_VCS), !skip_vcs);
        prop_assert_eq!(names.contains(&plan::FIX_PLATFORM_PATHS), platform == Platform::Windows);
        prop_assert_eq!(names.contains(&plan::INSTALL_TAILWIND), style);
        prop_assert_eq!(names.contains(&plan::INSTALL_HTMX), http);

        // Everything is reachable from the root.
        prop_assert_eq!(
            graph.transitive_dependents(plan::CLONE_TEMPLATE).len(),
            graph.len() - 1
        );
    }
}

#[test]
fn test_vcs_init_runs_after_every_other_task() {
    let graph = graph_for(&options(false, Platform::Windows, true, true));

    let deps = graph.dependencies_of(plan::INIT_VCS);
    for name in graph.tasks().filter(|n| *n != plan::INIT_VCS) {
        assert!(
            deps.iter().any(|d| d == name),
            "init-vcs should wait for {name}"
        );
    }
    assert!(graph.dependents_of(plan::INIT_VCS).is_empty());
}

#[test]
fn test_platform_fixup_waits_for_generation_and_tooling() {
    let graph = graph_for(&options(true, Platform::Windows, true, false));

    let deps = graph.dependencies_of(plan::FIX_PLATFORM_PATHS);
    for required in [plan::GENERATE_TEMPL, plan::INSTALL_AIR, plan::INSTALL_TAILWIND] {
        assert!(
            deps.iter().any(|d| d == required),
            "missing dependency on {required}"
        );
    }

    match &graph.spec(plan::FIX_PLATFORM_PATHS).unwrap().operation {
        Operation::RewriteExecutablePaths {
            file,
            executable,
            suffix,
        } => {
            assert_eq!(file.to_str(), Some(".air.toml"));
            assert_eq!(executable, "./tmp/main");
            assert_eq!(suffix, ".exe");
        }
        other => panic!("unexpected operation {other:?}"),
    }
}

#[test]
fn test_code_generation_depends_on_template_and_generator() {
    let graph = graph_for(&ProvisionOptions::default());

    let deps = graph.dependencies_of(plan::GENERATE_TEMPL);
    assert!(deps.iter().any(|d| d == plan::CLONE_TEMPLATE));
    assert!(deps.iter().any(|d| d == plan::INSTALL_TEMPL));

    // Tool installs are independent of each other and of the dependency download.
    for install in [plan::INSTALL_TEMPL, plan::INSTALL_AIR] {
        assert_eq!(
            graph.dependencies_of(install),
            [plan::CLONE_TEMPLATE.to_string()]
        );
        assert_eq!(graph.spec(install).unwrap().policy, FailurePolicy::Advisory);
    }
    assert_eq!(
        graph.dependencies_of(plan::TIDY_DEPS),
        [plan::DOWNLOAD_DEPS.to_string()]
    );
}

#[test]
fn test_clone_uses_configured_vcs_and_template() {
    let create = CreateSection {
        vcs: "jj".to_string(),
        template_url: "https://example.com/t.git".to_string(),
        ..CreateSection::default()
    };
    let graph = build_task_graph(&ProvisionOptions::default(), &create).unwrap();

    match &graph.spec(plan::CLONE_TEMPLATE).unwrap().operation {
        Operation::Command(cmd) => {
            assert_eq!(cmd.program, "jj");
            assert_eq!(cmd.args, ["clone", "https://example.com/t.git", "."]);
        }
        other => panic!("unexpected operation {other:?}"),
    }
}
