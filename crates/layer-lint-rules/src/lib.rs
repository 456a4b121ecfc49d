//! # layer-lint-rules
//!
//! Graph rules for layer-lint.
//!
//! Rules run over a finished module graph (see [`GraphContext`]) and know
//! nothing about parsing; any front end that produces
//! [`layer_lint_core::Module`]s can feed them.
//!
//! ## Available Rules
//!
//! | Code | Name | Severity | Description |
//! |------|------|----------|-------------|
//! | LL001 | `unresolved-import` | info | Internal-looking imports that match no file |
//! | LL002 | `dependency-direction` | error | Imports of layers missing from the allow-list |
//! | LL003 | `circular-dependency` | warning | Import cycles between local modules |
//! | LL004 | `business-logic-placement` | warning | Business vocabulary exported from presentation layers |
//! | LL005 | `<ecosystem>-architecture-anti-pattern` | warning | Ecosystem-specific layering smells |
//!
//! ## Usage
//!
//! ```ignore
//! use layer_lint_rules::RuleEngine;
//!
//! let engine = RuleEngine::new(ecosystem, &config);
//! let violations = engine.check(&modules);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod anti_pattern;
mod business_logic_placement;
mod circular_dependency;
mod dependency_direction;
mod engine;
mod role;
mod rule;
mod unresolved_import;

pub use anti_pattern::{AntiPatternProfile, ArchitectureAntiPattern};
pub use business_logic_placement::{BusinessLogicPlacement, BUSINESS_KEYWORDS};
pub use circular_dependency::CircularDependency;
pub use dependency_direction::DependencyDirection;
pub use engine::{all_rules, RuleEngine};
pub use role::LayerRole;
pub use rule::{GraphContext, GraphRule, GraphRuleBox};
pub use unresolved_import::UnresolvedImport;

/// Re-export core types for convenience.
pub use layer_lint_core::{Severity, Violation};
