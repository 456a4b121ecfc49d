//! Rule trait and the read-only graph context rules run against.

use layer_lint_core::{Ecosystem, LayerDefinition, Module, Severity, Violation};
use std::collections::HashMap;

/// A check over the assembled module graph.
///
/// Rules are read-only over [`GraphContext`] and independent of each other,
/// so the engine may run them concurrently.
///
/// # Example
///
/// ```ignore
/// use layer_lint_rules::{GraphContext, GraphRule};
/// use layer_lint_core::{Severity, Violation};
///
/// pub struct NoOrphans;
///
/// impl GraphRule for NoOrphans {
///     fn name(&self) -> &'static str { "no-orphans" }
///     fn code(&self) -> &'static str { "LL100" }
///
///     fn check(&self, graph: &GraphContext<'_>) -> Vec<Violation> {
///         Vec::new()
///     }
/// }
/// ```
pub trait GraphRule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "dependency-direction").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "LL002").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Checks the whole graph and returns any violations found.
    fn check(&self, graph: &GraphContext<'_>) -> Vec<Violation>;
}

/// Type alias for boxed [`GraphRule`] trait objects.
pub type GraphRuleBox = Box<dyn GraphRule>;

/// Read-only view of one analysis run's module graph.
pub struct GraphContext<'a> {
    /// Ecosystem of the analyzed sources.
    pub ecosystem: Ecosystem,
    /// Modules sorted by path.
    pub modules: &'a [Module],
    /// Layer definitions in declaration order.
    pub layers: &'a [LayerDefinition],
    by_path: HashMap<&'a str, &'a Module>,
}

impl<'a> GraphContext<'a> {
    /// Creates a context over a module slice.
    #[must_use]
    pub fn new(ecosystem: Ecosystem, modules: &'a [Module], layers: &'a [LayerDefinition]) -> Self {
        let by_path = modules.iter().map(|m| (m.path.as_str(), m)).collect();
        Self {
            ecosystem,
            modules,
            layers,
            by_path,
        }
    }

    /// Looks up a module by its relative path.
    #[must_use]
    pub fn module(&self, path: &str) -> Option<&'a Module> {
        self.by_path.get(path).copied()
    }

    /// Layer assigned to the module at `path`, if both exist.
    #[must_use]
    pub fn layer_of(&self, path: &str) -> Option<&'a str> {
        self.module(path).and_then(Module::layer)
    }

    /// Looks up a layer definition by name.
    #[must_use]
    pub fn layer_definition(&self, name: &str) -> Option<&'a LayerDefinition> {
        self.layers.iter().find(|l| l.name == name)
    }
}
