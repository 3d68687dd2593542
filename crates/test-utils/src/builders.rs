#![allow(dead_code)]

use zinc::dag::{TaskGraph, TaskSpec};
use zinc::types::{CommandSpec, FailurePolicy, Operation};

/// A no-op command operation; fake executors never run it.
pub fn noop(label: &str) -> Operation {
    Operation::Command(CommandSpec::new("true", [label]))
}

/// Builder for small task graphs used by scheduler and runtime tests.
///
/// ```ignore
/// let graph = GraphBuilder::new()
///     .fatal("root", &[])
///     .advisory("a", &["root"])
///     .fatal("b", &["root", "a"])
///     .build();
/// ```
#[derive(Default)]
pub struct GraphBuilder {
    specs: Vec<TaskSpec>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fatal(self, name: &str, deps: &[&str]) -> Self {
        self.task(name, deps, FailurePolicy::Fatal)
    }

    pub fn advisory(self, name: &str, deps: &[&str]) -> Self {
        self.task(name, deps, FailurePolicy::Advisory)
    }

    pub fn task(mut self, name: &str, deps: &[&str], policy: FailurePolicy) -> Self {
        let spec = deps
            .iter()
            .fold(TaskSpec::new(name, noop(name), policy), |spec, dep| spec.after(*dep));
        self.specs.push(spec);
        self
    }

    pub fn specs(self) -> Vec<TaskSpec> {
        self.specs
    }

    pub fn build(self) -> TaskGraph {
        TaskGraph::new(self.specs).expect("builder produced an invalid graph")
    }
}
