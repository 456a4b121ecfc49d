//! Rule engine: runs every enabled check over a module graph.

use layer_lint_core::{Ecosystem, LayerDefinition, LintConfig, Module, Violation};
use rayon::prelude::*;
use tracing::debug;

use crate::rule::{GraphContext, GraphRuleBox};
use crate::{
    ArchitectureAntiPattern, BusinessLogicPlacement, CircularDependency, DependencyDirection,
    UnresolvedImport,
};

/// Returns every built-in rule, in engine order.
#[must_use]
pub fn all_rules() -> Vec<GraphRuleBox> {
    vec![
        Box::new(UnresolvedImport::new()),
        Box::new(DependencyDirection::new()),
        Box::new(CircularDependency::new()),
        Box::new(BusinessLogicPlacement::new()),
        Box::new(ArchitectureAntiPattern::new()),
    ]
}

/// Evaluates graph rules and concatenates their violations.
pub struct RuleEngine {
    ecosystem: Ecosystem,
    layers: Vec<LayerDefinition>,
    rules: Vec<GraphRuleBox>,
}

impl RuleEngine {
    /// Creates an engine with the built-in rules enabled by `config`.
    #[must_use]
    pub fn new(ecosystem: Ecosystem, config: &LintConfig) -> Self {
        let rules = all_rules()
            .into_iter()
            .filter(|rule| {
                let enabled = config.is_check_enabled(rule.name());
                if !enabled {
                    debug!("Skipping disabled check: {}", rule.name());
                }
                enabled
            })
            .collect();

        Self {
            ecosystem,
            layers: config.layers.clone(),
            rules,
        }
    }

    /// Creates an engine with an explicit rule list.
    #[must_use]
    pub fn with_rules(
        ecosystem: Ecosystem,
        layers: Vec<LayerDefinition>,
        rules: Vec<GraphRuleBox>,
    ) -> Self {
        Self {
            ecosystem,
            layers,
            rules,
        }
    }

    /// Names of the rules this engine runs, in order.
    #[must_use]
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Runs all rules over `modules`.
    ///
    /// Rules run in parallel; their outputs are concatenated in rule order
    /// with no merging or de-duplication across rules.
    #[must_use]
    pub fn check(&self, modules: &[Module]) -> Vec<Violation> {
        let graph = GraphContext::new(self.ecosystem, modules, &self.layers);

        let per_rule: Vec<Vec<Violation>> = self
            .rules
            .par_iter()
            .map(|rule| {
                let violations = rule.check(&graph);
                debug!("{}: {} violation(s)", rule.name(), violations.len());
                violations
            })
            .collect();

        per_rule.into_iter().flatten().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layer_lint_core::{Dependency, DependencyKind, CHECK_UNRESOLVED_IMPORT};

    fn config() -> LintConfig {
        LintConfig::new(
            Ecosystem::Python,
            vec![
                LayerDefinition::new("views", "**/views/**", ["viewmodel"]),
                LayerDefinition::new("viewmodel", "**/viewmodels/**", Vec::<String>::new()),
                LayerDefinition::new("data", "**/data/**", Vec::<String>::new()),
            ],
        )
    }

    fn modules() -> Vec<Module> {
        let mut view = Module::new("app/views/home.py");
        view.layer = Some("views".into());
        view.dependencies = vec![
            Dependency::new("app/views/home.py", "app.ghost", 1, "import app.ghost", DependencyKind::LocalUnresolved),
            Dependency::new("app/views/home.py", "app/data/repo.py", 2, "from app.data import repo", DependencyKind::LocalResolved),
        ];
        let mut data = Module::new("app/data/repo.py");
        data.layer = Some("data".into());
        vec![view, data]
    }

    #[test]
    fn concatenates_in_rule_order() {
        let engine = RuleEngine::new(Ecosystem::Python, &config());
        let v = engine.check(&modules());
        let rules: Vec<&str> = v.iter().map(|v| v.rule.as_str()).collect();
        assert_eq!(
            rules,
            vec![
                "unresolved-import",
                "dependency-direction",
                "python-architecture-anti-pattern",
            ]
        );
    }

    #[test]
    fn disabled_checks_are_skipped() {
        let mut config = config();
        config.set_check(CHECK_UNRESOLVED_IMPORT, false);
        let engine = RuleEngine::new(Ecosystem::Python, &config);
        assert!(!engine.rule_names().contains(&"unresolved-import"));
        let v = engine.check(&modules());
        assert!(v.iter().all(|v| v.rule != "unresolved-import"));
    }

    #[test]
    fn check_is_deterministic() {
        let engine = RuleEngine::new(Ecosystem::Python, &config());
        assert_eq!(engine.check(&modules()), engine.check(&modules()));
    }

    #[test]
    fn deep_chain_runs_on_worker_threads() {
        let n = 60_000;
        let name = |i: usize| format!("src/m{:05}.ts", i % n);
        let modules: Vec<Module> = (0..n)
            .map(|i| {
                let mut m = Module::new(name(i));
                m.dependencies = vec![Dependency::new(
                    name(i),
                    name(i + 1),
                    1,
                    "import './next'",
                    DependencyKind::LocalResolved,
                )];
                m
            })
            .collect();

        let engine = RuleEngine::new(Ecosystem::TypeScript, &config());
        let v = engine.check(&modules);
        let cycles: Vec<&Violation> = v.iter().filter(|v| v.rule == "circular-dependency").collect();
        assert_eq!(cycles.len(), 1);
    }
}
