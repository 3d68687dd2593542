// tests/report_format.rs

use std::path::PathBuf;

use zinc::errors::TaskError;
use zinc::report::{RunOutcome, RunReport, TaskReport, TaskResult};
use zinc::types::FailurePolicy;

fn task(name: &str, policy: FailurePolicy, result: TaskResult) -> TaskReport {
    TaskReport {
        name: name.to_string(),
        policy,
        result,
    }
}

#[test]
fn test_report_rows_have_no_trailing_whitespace() {
    let report = RunReport {
        project: PathBuf::from("/proj"),
        outcome: RunOutcome::Completed,
        tasks: vec![
            task("clone-template", FailurePolicy::Fatal, TaskResult::Succeeded),
            task(
                "install-tailwind",
                FailurePolicy::Advisory,
                TaskResult::Failed(TaskError::ProcessExitFailure {
                    program: "npm".to_string(),
                    code: 1,
                }),
            ),
            task("init-vcs", FailurePolicy::Advisory, TaskResult::Succeeded),
        ],
    };

    let rendered = report.to_string();
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(
        lines,
        vec![
            "provisioning report for /proj",
            "  ok       clone-template",
            "  warning  install-tailwind  `npm` exited with status 1",
            "  ok       init-vcs",
            "outcome: completed",
        ]
    );
    for line in &lines {
        assert_eq!(line.trim_end(), *line);
    }
}
