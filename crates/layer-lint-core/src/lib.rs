//! # layer-lint-core
//!
//! Core types for layer-lint, the multi-language architecture layer linter.
//!
//! This crate holds what every other layer-lint crate agrees on:
//!
//! - [`Violation`] and [`LintResult`] for representing lint findings
//! - [`LintConfig`] and [`LayerDefinition`] for the TOML configuration
//! - [`Module`] and [`Dependency`], the module graph handed from the graph
//!   builder to the rule engine
//!
//! ## Example
//!
//! ```ignore
//! use layer_lint_core::{LintConfig, LayerDefinition, Ecosystem};
//!
//! let config = LintConfig::new(
//!     Ecosystem::Kotlin,
//!     vec![LayerDefinition::new("view", "**/views/**", ["viewmodel"])],
//! );
//! config.validate()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod model;
mod types;

/// Utility modules for name handling.
pub mod utils;

pub use config::{
    AnalyzerConfig, ConfigError, LayerDefinition, LintConfig, CHECK_ANTI_PATTERN,
    CHECK_BUSINESS_LOGIC_PLACEMENT, CHECK_CIRCULAR_DEPENDENCY, CHECK_DEPENDENCY_DIRECTION,
    CHECK_NAMES, CHECK_UNRESOLVED_IMPORT,
};
pub use model::{Dependency, DependencyKind, Ecosystem, Module, Signal, SignalKind};
pub use types::{LintResult, Location, Severity, Suggestion, Violation};
