//! Configuration types for layer-lint.
//!
//! A config file declares the ecosystem to analyze, an ordered list of
//! `[[layers]]`, and optional `[checks]` toggles:
//!
//! ```toml
//! [analyzer]
//! ecosystem = "kotlin"
//!
//! [[layers]]
//! name = "view"
//! pattern = "**/views/**"
//! allow = ["viewmodel"]
//!
//! [checks]
//! unresolved-import = false
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use crate::model::Ecosystem;

/// Check reporting imports that look internal but resolve nowhere.
pub const CHECK_UNRESOLVED_IMPORT: &str = "unresolved-import";
/// Check enforcing layer allow-lists.
pub const CHECK_DEPENDENCY_DIRECTION: &str = "dependency-direction";
/// Check reporting import cycles.
pub const CHECK_CIRCULAR_DEPENDENCY: &str = "circular-dependency";
/// Check flagging business vocabulary exported from presentation layers.
pub const CHECK_BUSINESS_LOGIC_PLACEMENT: &str = "business-logic-placement";
/// Ecosystem-specific anti-pattern detectors.
pub const CHECK_ANTI_PATTERN: &str = "architecture-anti-pattern";

/// Every check name accepted under `[checks]`, in engine order.
pub const CHECK_NAMES: [&str; 5] = [
    CHECK_UNRESOLVED_IMPORT,
    CHECK_DEPENDENCY_DIRECTION,
    CHECK_CIRCULAR_DEPENDENCY,
    CHECK_BUSINESS_LOGIC_PLACEMENT,
    CHECK_ANTI_PATTERN,
];

/// Top-level configuration for layer-lint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LintConfig {
    /// Analyzer configuration.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Layer definitions, in declaration order.
    #[serde(default)]
    pub layers: Vec<LayerDefinition>,

    /// Check name -> enabled. Missing entries are enabled.
    #[serde(default)]
    pub checks: BTreeMap<String, bool>,
}

/// Analyzer-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Root directory to analyze (default: current directory).
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Ecosystem of the analyzed sources.
    #[serde(default)]
    pub ecosystem: Option<Ecosystem>,

    /// Glob patterns (relative to root) to exclude from analysis.
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            ecosystem: None,
            exclude: Vec::new(),
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

/// A named architecture layer matched by path pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerDefinition {
    /// Layer name (e.g., `"view"`, `"domain"`).
    pub name: String,
    /// Glob-like path pattern (e.g., `"**/views/**"`).
    pub pattern: String,
    /// Layers this layer may depend on.
    #[serde(default, alias = "allowed")]
    pub allow: Vec<String>,
    /// Explicit precedence; higher wins when several patterns match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precedence: Option<i32>,
}

impl LayerDefinition {
    /// Creates a layer definition without explicit precedence.
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, pattern: impl Into<String>, allow: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            allow: allow.into_iter().map(Into::into).collect(),
            precedence: None,
        }
    }

    /// Sets the explicit precedence.
    #[must_use]
    pub fn with_precedence(mut self, precedence: i32) -> Self {
        self.precedence = Some(precedence);
        self
    }

    /// Effective precedence (0 when unset).
    #[must_use]
    pub fn effective_precedence(&self) -> i32 {
        self.precedence.unwrap_or(0)
    }

    /// Whether this layer may depend on `layer`.
    #[must_use]
    pub fn allows(&self, layer: &str) -> bool {
        self.allow.iter().any(|a| a == layer)
    }
}

impl LintConfig {
    /// Creates a configuration for an ecosystem and layer list.
    #[must_use]
    pub fn new(ecosystem: Ecosystem, layers: Vec<LayerDefinition>) -> Self {
        Self {
            analyzer: AnalyzerConfig {
                ecosystem: Some(ecosystem),
                ..AnalyzerConfig::default()
            },
            layers,
            checks: BTreeMap::new(),
        }
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        tracing::debug!("Loaded config from {}", path.display());
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Checks if a check is enabled.
    #[must_use]
    pub fn is_check_enabled(&self, check: &str) -> bool {
        self.checks.get(check).copied().unwrap_or(true)
    }

    /// Enables or disables a check.
    pub fn set_check(&mut self, check: &str, enabled: bool) {
        self.checks.insert(check.to_string(), enabled);
    }

    /// Looks up a layer definition by name.
    #[must_use]
    pub fn layer(&self, name: &str) -> Option<&LayerDefinition> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// Returns the configured ecosystem.
    ///
    /// # Errors
    ///
    /// Returns error if `analyzer.ecosystem` is missing.
    pub fn ecosystem(&self) -> Result<Ecosystem, ConfigError> {
        self.analyzer
            .ecosystem
            .ok_or_else(|| ConfigError::Validation("analyzer.ecosystem is required".into()))
    }

    /// Validate config consistency.
    ///
    /// # Errors
    ///
    /// Returns error describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.ecosystem()?;

        if self.layers.is_empty() {
            return Err(ConfigError::Validation(
                "at least one [[layers]] entry is required".into(),
            ));
        }

        let mut names: HashSet<&str> = HashSet::new();
        for (i, layer) in self.layers.iter().enumerate() {
            if layer.name.is_empty() {
                return Err(ConfigError::Validation(format!("layers[{i}]: empty name")));
            }
            if !layer
                .name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
            {
                return Err(ConfigError::Validation(format!(
                    "layers[{i}]: invalid name '{}' (use [a-z0-9_-])",
                    layer.name
                )));
            }
            if layer.pattern.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "layer '{}': empty pattern",
                    layer.name
                )));
            }
            if !names.insert(layer.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "layer '{}' is declared twice",
                    layer.name
                )));
            }
        }

        for layer in &self.layers {
            for dep in &layer.allow {
                if !names.contains(dep.as_str()) {
                    return Err(ConfigError::Validation(format!(
                        "layer '{}': unknown layer '{dep}' in allow-list",
                        layer.name
                    )));
                }
            }
        }

        for check in self.checks.keys() {
            if !CHECK_NAMES.contains(&check.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "checks.{check}: unknown check (expected one of {})",
                    CHECK_NAMES.join(", ")
                )));
            }
        }

        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// Config is structurally invalid.
    #[error("Invalid config: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let toml = r#"
[analyzer]
root = "./app"
ecosystem = "kotlin"
exclude = ["**/generated/**"]

[[layers]]
name = "view"
pattern = "**/views/**"
allow = ["viewmodel"]

[[layers]]
name = "viewmodel"
pattern = "**/viewmodels/**"
allow = ["data"]
precedence = 2

[[layers]]
name = "data"
pattern = "**/data/**"

[checks]
unresolved-import = false
"#;
        let config = LintConfig::parse(toml).expect("parse failed");
        assert_eq!(config.analyzer.root, PathBuf::from("./app"));
        assert_eq!(config.analyzer.ecosystem, Some(Ecosystem::Kotlin));
        assert_eq!(config.layers.len(), 3);
        assert_eq!(config.layers[1].effective_precedence(), 2);
        assert_eq!(config.layers[2].effective_precedence(), 0);
        assert!(config.layers[0].allows("viewmodel"));
        assert!(!config.is_check_enabled(CHECK_UNRESOLVED_IMPORT));
        assert!(config.is_check_enabled(CHECK_CIRCULAR_DEPENDENCY));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_requires_ecosystem() {
        let toml = r#"
[[layers]]
name = "domain"
pattern = "domain/**"
"#;
        let config = LintConfig::parse(toml).expect("parse failed");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ecosystem"));
    }

    #[test]
    fn validate_catches_unknown_allowed_layer() {
        let config = LintConfig::new(
            Ecosystem::Python,
            vec![LayerDefinition::new("view", "**/views/**", ["ghost"])],
        );
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn validate_catches_duplicate_layer() {
        let config = LintConfig::new(
            Ecosystem::Python,
            vec![
                LayerDefinition::new("view", "**/views/**", Vec::<String>::new()),
                LayerDefinition::new("view", "**/ui/**", Vec::<String>::new()),
            ],
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_catches_invalid_layer_name() {
        let config = LintConfig::new(
            Ecosystem::Swift,
            vec![LayerDefinition::new("View Layer", "**/views/**", Vec::<String>::new())],
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_catches_unknown_check() {
        let mut config = LintConfig::new(
            Ecosystem::Swift,
            vec![LayerDefinition::new("view", "**/views/**", Vec::<String>::new())],
        );
        config.set_check("no-such-check", true);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("no-such-check"));
    }

    #[test]
    fn validate_requires_layers() {
        let config = LintConfig::new(Ecosystem::TypeScript, Vec::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_field_is_parse_error() {
        let toml = r#"
[[layers]]
name = "domain"
"#;
        assert!(matches!(
            LintConfig::parse(toml),
            Err(ConfigError::Parse { .. })
        ));
    }
}
