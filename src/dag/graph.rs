// src/dag/graph.rs

use std::collections::{HashMap, HashSet};

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::dag::task_info::TaskSpec;
use crate::engine::TaskName;
use crate::errors::{Result, ZincError};
use crate::types::FailurePolicy;

/// Internal node structure: the task spec plus its immediate dependents.
#[derive(Debug, Clone)]
struct DagNode {
    spec: TaskSpec,
    /// Direct dependents: tasks that list this one in `deps`.
    dependents: Vec<TaskName>,
}

/// Validated provisioning graph keyed by task name.
///
/// Construction checks every structural invariant up front, so the scheduler
/// can assume: names are unique, every dependency exists, there are no
/// cycles, and exactly one task (the root) has no dependencies.
#[derive(Debug, Clone)]
pub struct TaskGraph {
    /// Task names in plan order; used for deterministic iteration.
    order: Vec<TaskName>,
    nodes: HashMap<TaskName, DagNode>,
}

impl TaskGraph {
    pub fn new(specs: Vec<TaskSpec>) -> Result<Self> {
        validate_specs(&specs)?;

        let order: Vec<TaskName> = specs.iter().map(|s| s.name.clone()).collect();
        let mut nodes: HashMap<TaskName, DagNode> = specs
            .into_iter()
            .map(|spec| {
                (
                    spec.name.clone(),
                    DagNode {
                        spec,
                        dependents: Vec::new(),
                    },
                )
            })
            .collect();

        // Second pass: populate dependents in plan order.
        for name in &order {
            let deps = nodes
                .get(name)
                .map(|n| n.spec.deps.clone())
                .unwrap_or_default();

            for dep in deps {
                if let Some(dep_node) = nodes.get_mut(&dep) {
                    dep_node.dependents.push(name.clone());
                }
            }
        }

        Ok(Self { order, nodes })
    }

    /// All task names, in plan order.
    pub fn tasks(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn spec(&self, name: &str) -> Option<&TaskSpec> {
        self.nodes.get(name).map(|n| &n.spec)
    }

    /// Specs in plan order.
    pub fn specs(&self) -> impl Iterator<Item = &TaskSpec> {
        self.order.iter().filter_map(|name| self.spec(name))
    }

    /// Immediate dependencies of a task.
    pub fn dependencies_of(&self, name: &str) -> &[TaskName] {
        self.nodes
            .get(name)
            .map(|n| n.spec.deps.as_slice())
            .unwrap_or(&[])
    }

    /// Immediate dependents of a task.
    pub fn dependents_of(&self, name: &str) -> &[TaskName] {
        self.nodes
            .get(name)
            .map(|n| n.dependents.as_slice())
            .unwrap_or(&[])
    }

    /// Tasks with no dependencies. A validated graph has exactly one.
    pub fn roots(&self) -> Vec<&str> {
        self.tasks()
            .filter(|name| self.dependencies_of(name).is_empty())
            .collect()
    }

    /// Every task reachable from `name` through dependent edges.
    pub fn transitive_dependents(&self, name: &str) -> HashSet<TaskName> {
        let mut seen = HashSet::new();
        let mut stack: Vec<&TaskName> = self.dependents_of(name).iter().collect();
        while let Some(next) = stack.pop() {
            if seen.insert(next.clone()) {
                stack.extend(self.dependents_of(next));
            }
        }
        seen
    }
}

fn validate_specs(specs: &[TaskSpec]) -> Result<()> {
    ensure_unique_names(specs)?;
    validate_task_dependencies(specs)?;
    validate_acyclic(specs)?;
    ensure_single_root(specs)?;
    Ok(())
}

fn ensure_unique_names(specs: &[TaskSpec]) -> Result<()> {
    let mut seen = HashSet::new();
    for spec in specs {
        if !seen.insert(spec.name.as_str()) {
            return Err(ZincError::InvalidGraph(format!(
                "task '{}' is defined more than once",
                spec.name
            )));
        }
    }
    Ok(())
}

fn validate_task_dependencies(specs: &[TaskSpec]) -> Result<()> {
    let names: HashSet<&str> = specs.iter().map(|s| s.name.as_str()).collect();
    for spec in specs {
        for dep in &spec.deps {
            if dep == &spec.name {
                return Err(ZincError::InvalidGraph(format!(
                    "task '{}' cannot depend on itself",
                    spec.name
                )));
            }
            if !names.contains(dep.as_str()) {
                return Err(ZincError::InvalidGraph(format!(
                    "task '{}' has unknown dependency '{}'",
                    spec.name, dep
                )));
            }
        }
    }
    Ok(())
}

fn validate_acyclic(specs: &[TaskSpec]) -> Result<()> {
    // Edge direction: dep -> task.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for spec in specs {
        graph.add_node(spec.name.as_str());
    }
    for spec in specs {
        for dep in &spec.deps {
            graph.add_edge(dep.as_str(), spec.name.as_str(), ());
        }
    }

    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => Err(ZincError::DagCycle(format!(
            "cycle detected in task graph involving task '{}'",
            cycle.node_id()
        ))),
    }
}

fn ensure_single_root(specs: &[TaskSpec]) -> Result<()> {
    let roots: Vec<&TaskSpec> = specs.iter().filter(|s| s.deps.is_empty()).collect();

    match roots.as_slice() {
        [root] if root.policy == FailurePolicy::Fatal => Ok(()),
        [root] => Err(ZincError::InvalidGraph(format!(
            "root task '{}' must use the fatal failure policy",
            root.name
        ))),
        [] => Err(ZincError::InvalidGraph(
            "task graph has no root task".to_string(),
        )),
        _ => Err(ZincError::InvalidGraph(format!(
            "task graph must have exactly one root, found {}: {:?}",
            roots.len(),
            roots.iter().map(|r| r.name.as_str()).collect::<Vec<_>>()
        ))),
    }
}
