//! Rule reporting imports that look internal but resolve to no file.
//!
//! External (third-party or framework) imports are never reported; only
//! dependencies the resolver classified as local-unresolved are.

use layer_lint_core::{Location, Severity, Suggestion, Violation, CHECK_UNRESOLVED_IMPORT};

use crate::rule::{GraphContext, GraphRule};

/// Rule code for unresolved-import.
pub const CODE: &str = "LL001";

/// Rule name for unresolved-import.
pub const NAME: &str = CHECK_UNRESOLVED_IMPORT;

/// Reports local-unresolved dependencies.
#[derive(Debug, Clone)]
pub struct UnresolvedImport {
    /// Severity level.
    pub severity: Severity,
}

impl Default for UnresolvedImport {
    fn default() -> Self {
        Self::new()
    }
}

impl UnresolvedImport {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Info,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl GraphRule for UnresolvedImport {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Reports imports that look internal but match no analyzed file"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, graph: &GraphContext<'_>) -> Vec<Violation> {
        graph
            .modules
            .iter()
            .flat_map(|m| m.dependencies.iter())
            .filter(|d| d.is_unresolved())
            .map(|d| {
                Violation::new(
                    CODE,
                    NAME,
                    self.severity,
                    Location::line(&d.source, d.line),
                    format!("Unresolved import '{}'", d.target),
                )
                .with_suggestion(Suggestion::new(
                    "Check the import path, or include the target file in the analyzed root",
                ))
            })
            .collect()
    }
}
