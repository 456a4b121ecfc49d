//! Cycle detection over local-resolved dependencies.
//!
//! The graph only contains edges between two distinct known modules;
//! external and unresolved dependencies never close a cycle. Detection is a
//! depth-first search over an explicit frame stack, started from every
//! unvisited module in path order. Each back edge yields the stack slice
//! from the revisited module to the top.
//!
//! Cycles are canonicalized by rotating them to start at their smallest
//! path, then de-duplicated, so the same loop reached from different start
//! points is reported once.

use layer_lint_core::{Location, Severity, Suggestion, Violation, CHECK_CIRCULAR_DEPENDENCY};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::rule::{GraphContext, GraphRule};

/// Rule code for circular-dependency.
pub const CODE: &str = "LL003";

/// Rule name for circular-dependency.
pub const NAME: &str = CHECK_CIRCULAR_DEPENDENCY;

/// Reports import cycles between local modules.
#[derive(Debug, Clone)]
pub struct CircularDependency {
    /// Severity level.
    pub severity: Severity,
}

impl Default for CircularDependency {
    fn default() -> Self {
        Self::new()
    }
}

impl CircularDependency {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Warning,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl GraphRule for CircularDependency {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Reports circular dependencies between local modules"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, graph: &GraphContext<'_>) -> Vec<Violation> {
        let edges = EdgeMap::build(graph);
        let cycles = detect_cycles(&edges.adjacency);

        cycles
            .into_iter()
            .map(|cycle| {
                let first = cycle[0];
                let next = cycle.get(1).copied().unwrap_or(first);
                let line = edges.line(first, next);

                let mut path: Vec<&str> = cycle.clone();
                path.push(first);

                Violation::new(
                    CODE,
                    NAME,
                    self.severity,
                    Location::line(first, line),
                    format!("Circular dependency: {}", path.join(" -> ")),
                )
                .with_suggestion(Suggestion::new(
                    "Break the cycle by extracting the shared code or inverting one dependency",
                ))
            })
            .collect()
    }
}

/// Adjacency between known modules, plus the first import line per edge.
struct EdgeMap<'a> {
    adjacency: BTreeMap<&'a str, BTreeSet<&'a str>>,
    lines: HashMap<(&'a str, &'a str), usize>,
}

impl<'a> EdgeMap<'a> {
    fn build(graph: &GraphContext<'a>) -> Self {
        let mut adjacency: BTreeMap<&'a str, BTreeSet<&'a str>> = BTreeMap::new();
        let mut lines: HashMap<(&'a str, &'a str), usize> = HashMap::new();

        for module in graph.modules {
            let from = module.path.as_str();
            adjacency.entry(from).or_default();

            for dep in module.dependencies.iter().filter(|d| d.is_local()) {
                let Some(target) = graph.module(&dep.target) else {
                    continue;
                };
                let to = target.path.as_str();
                if to == from {
                    continue;
                }
                adjacency.entry(from).or_default().insert(to);
                lines
                    .entry((from, to))
                    .and_modify(|l| *l = (*l).min(dep.line))
                    .or_insert(dep.line);
            }
        }

        Self { adjacency, lines }
    }

    fn line(&self, from: &str, to: &str) -> usize {
        self.lines.get(&(from, to)).copied().unwrap_or(1)
    }
}

/// Detects cycles in a dependency graph.
///
/// Returns canonicalized, de-duplicated cycles in discovery order. Each
/// cycle lists its nodes once, without repeating the first node at the end.
fn detect_cycles<'a>(adjacency: &BTreeMap<&'a str, BTreeSet<&'a str>>) -> Vec<Vec<&'a str>> {
    let mut state = DfsState::default();

    for &root in adjacency.keys() {
        if !state.visited.contains(root) {
            dfs(root, adjacency, &mut state);
        }
    }

    state.cycles
}

#[derive(Default)]
struct DfsState<'a> {
    visited: HashSet<&'a str>,
    on_stack: HashSet<&'a str>,
    path: Vec<&'a str>,
    seen: BTreeSet<Vec<&'a str>>,
    cycles: Vec<Vec<&'a str>>,
}

impl<'a> DfsState<'a> {
    fn enter(&mut self, node: &'a str) {
        self.visited.insert(node);
        self.on_stack.insert(node);
        self.path.push(node);
    }

    fn leave(&mut self) {
        if let Some(node) = self.path.pop() {
            self.on_stack.remove(node);
        }
    }
}

/// Iterative depth-first search from `root`.
///
/// Each frame holds a node and the index of its next unexplored edge, so
/// chain length is bounded by heap memory rather than the thread stack.
fn dfs<'a>(root: &'a str, adjacency: &BTreeMap<&'a str, BTreeSet<&'a str>>, state: &mut DfsState<'a>) {
    let neighbors = |node: &str| -> Vec<&'a str> {
        adjacency
            .get(node)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    };

    let mut frames: Vec<(Vec<&'a str>, usize)> = vec![(neighbors(root), 0)];
    state.enter(root);

    while let Some((edges, next)) = frames.last_mut() {
        let Some(&target) = edges.get(*next) else {
            frames.pop();
            state.leave();
            continue;
        };
        *next += 1;

        if state.on_stack.contains(target) {
            record_cycle(target, state);
        } else if !state.visited.contains(target) {
            state.enter(target);
            frames.push((neighbors(target), 0));
        }
    }
}

fn record_cycle<'a>(entry: &'a str, state: &mut DfsState<'a>) {
    let Some(pos) = state.path.iter().rposition(|n| *n == entry) else {
        return;
    };
    let cycle = canonicalize(&state.path[pos..]);
    if state.seen.insert(cycle.clone()) {
        state.cycles.push(cycle);
    }
}

/// Rotates a cycle so that it starts at its smallest node.
fn canonicalize<'a>(cycle: &[&'a str]) -> Vec<&'a str> {
    let start = cycle
        .iter()
        .enumerate()
        .min_by_key(|(_, n)| **n)
        .map_or(0, |(i, _)| i);
    cycle[start..].iter().chain(&cycle[..start]).copied().collect()
}
