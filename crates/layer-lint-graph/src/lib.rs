//! # layer-lint-graph
//!
//! Multi-language import graph builder for layer-lint.
//!
//! Turns a source tree into the module graph the rule engine checks:
//!
//! - [`SourceWalker`] lists source files, pruning dependency and build dirs
//! - [`ImportParser`] implementations extract imports and exports per
//!   ecosystem ([`TypeScriptParser`] via Tree-sitter; [`PythonParser`],
//!   [`KotlinParser`], [`SwiftParser`] lexically over a sanitized copy)
//! - [`ModuleIndex`] and [`Resolver`] classify every import as local,
//!   unresolved, or external
//! - [`LayerAssigner`] maps each module path to a layer
//! - [`Analyzer`] runs the whole pipeline and the rule engine
//!
//! ## Usage
//!
//! ```ignore
//! use layer_lint_core::LintConfig;
//! use layer_lint_graph::Analyzer;
//!
//! let config = LintConfig::from_file(Path::new("layer-lint.toml"))?;
//! let result = Analyzer::new(config)?.analyze()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod analyzer;
pub mod extractor;
pub mod index;
pub mod kotlin;
pub mod layer;
pub mod python;
pub mod resolver;
pub mod sanitize;
pub mod swift;
pub mod typescript;
pub mod walker;

pub use analyzer::{analyze, AnalyzeError, Analyzer};
pub use extractor::{parser_for, ImportCandidate, ImportParser, ImportTarget, ParsedFile, SourceFile};
pub use index::ModuleIndex;
pub use kotlin::KotlinParser;
pub use layer::{LayerAssigner, LayerPattern, LayerPatternError};
pub use python::PythonParser;
pub use resolver::Resolver;
pub use swift::SwiftParser;
pub use typescript::TypeScriptParser;
pub use walker::SourceWalker;

use regex::Regex;

/// Compiles a regex written as a literal in this crate.
#[allow(clippy::expect_used)]
pub(crate) fn literal_regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("literal regex must compile")
}
