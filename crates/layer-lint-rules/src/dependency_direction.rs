//! Rule enforcing layer allow-lists on resolved dependencies.
//!
//! # Detected Patterns
//!
//! A local-resolved dependency whose source and target modules both carry
//! a layer, the layers differ, and the target layer is missing from the
//! source layer's `allow` list.
//!
//! Modules without a layer never take part in this check; same-layer
//! imports are always allowed.

use layer_lint_core::{Location, Severity, Suggestion, Violation, CHECK_DEPENDENCY_DIRECTION};

use crate::rule::{GraphContext, GraphRule};

/// Rule code for dependency-direction.
pub const CODE: &str = "LL002";

/// Rule name for dependency-direction.
pub const NAME: &str = CHECK_DEPENDENCY_DIRECTION;

/// Enforces configured layer dependency directions.
#[derive(Debug, Clone)]
pub struct DependencyDirection {
    /// Severity level.
    pub severity: Severity,
}

impl Default for DependencyDirection {
    fn default() -> Self {
        Self::new()
    }
}

impl DependencyDirection {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Error,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl GraphRule for DependencyDirection {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids dependencies on layers missing from the allow-list"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, graph: &GraphContext<'_>) -> Vec<Violation> {
        let mut violations = Vec::new();

        for module in graph.modules {
            let Some(from_layer) = module.layer() else {
                continue;
            };
            let Some(definition) = graph.layer_definition(from_layer) else {
                continue;
            };

            for dep in module.dependencies.iter().filter(|d| d.is_local()) {
                let Some(to_layer) = graph.layer_of(&dep.target) else {
                    continue;
                };
                if to_layer == from_layer || definition.allows(to_layer) {
                    continue;
                }

                let allowed = if definition.allow.is_empty() {
                    "nothing".to_string()
                } else {
                    definition.allow.join(", ")
                };

                violations.push(
                    Violation::new(
                        CODE,
                        NAME,
                        self.severity,
                        Location::line(&module.path, dep.line),
                        format!(
                            "{from_layer} -> {to_layer} dependency not allowed: '{}' imports '{}'",
                            module.path, dep.target
                        ),
                    )
                    .with_suggestion(Suggestion::new(format!(
                        "Layer '{from_layer}' may depend on: {allowed}"
                    ))),
                );
            }
        }

        violations
    }
}
