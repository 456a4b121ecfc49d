//! Rule flagging business vocabulary exported from presentation layers.
//!
//! # Rationale
//!
//! A view module that exports `calculateTotal` or `validateOrder` is usually
//! holding logic that belongs in a domain or state-holder layer.
//!
//! Only modules whose layer classifies as [`LayerRole::Presentation`] are
//! inspected. Default exports are skipped.

use layer_lint_core::{
    Location, Severity, Suggestion, Violation, CHECK_BUSINESS_LOGIC_PLACEMENT,
};

use crate::role::LayerRole;
use crate::rule::{GraphContext, GraphRule};

/// Rule code for business-logic-placement.
pub const CODE: &str = "LL004";

/// Rule name for business-logic-placement.
pub const NAME: &str = CHECK_BUSINESS_LOGIC_PLACEMENT;

/// Keywords that mark an exported name as business logic.
pub const BUSINESS_KEYWORDS: &[&str] = &[
    "calculate",
    "validate",
    "process",
    "transform",
    "business",
    "rule",
    "logic",
    "compute",
    "workflow",
];

/// Flags business-logic exports in presentation layers.
#[derive(Debug, Clone)]
pub struct BusinessLogicPlacement {
    /// Severity level.
    pub severity: Severity,
    /// Lowercase keywords searched for in exported names.
    pub keywords: Vec<String>,
}

impl Default for BusinessLogicPlacement {
    fn default() -> Self {
        Self::new()
    }
}

impl BusinessLogicPlacement {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Warning,
            keywords: BUSINESS_KEYWORDS.iter().map(|k| (*k).to_string()).collect(),
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    fn matching_keyword(&self, symbol: &str) -> Option<&str> {
        let lower = symbol.to_lowercase();
        self.keywords
            .iter()
            .find(|k| lower.contains(k.as_str()))
            .map(String::as_str)
    }
}

impl GraphRule for BusinessLogicPlacement {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Flags business-logic exports in presentation layers"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, graph: &GraphContext<'_>) -> Vec<Violation> {
        let mut violations = Vec::new();

        for module in graph.modules {
            let Some(layer) = module.layer() else {
                continue;
            };
            if LayerRole::classify(layer) != LayerRole::Presentation {
                continue;
            }

            for symbol in module.exports.iter().filter(|s| s.as_str() != "default") {
                let Some(keyword) = self.matching_keyword(symbol) else {
                    continue;
                };
                violations.push(
                    Violation::new(
                        CODE,
                        NAME,
                        self.severity,
                        Location::line(&module.path, module.export_line(symbol)),
                        format!(
                            "'{symbol}' looks like business logic ('{keyword}') in presentation layer '{layer}'"
                        ),
                    )
                    .with_suggestion(Suggestion::new(
                        "Move business rules into a domain or state-holder layer",
                    )),
                );
            }
        }

        violations
    }
}
